use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use crate::config::LottoConfig;
use crate::error::FetchError;
use crate::http_client::http_client;

const SNIPPET_CHARS: usize = 220;

/// Raw access to the lottery data sources. One attempt per call; callers
/// decide what a failure means.
pub trait Upstream {
    /// POSTs a JSON body and returns the response text.
    fn post_json(&self, url: &str, body: &Value) -> Result<String, FetchError>;

    /// GETs an HTML document, already decompressed.
    fn get_html(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpUpstream {
    client: &'static Client,
}

impl HttpUpstream {
    pub fn new(cfg: &LottoConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client(cfg)?,
        })
    }
}

impl Upstream for HttpUpstream {
    fn post_json(&self, url: &str, body: &Value) -> Result<String, FetchError> {
        debug!(url, "posting upstream json request");
        let resp = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .map_err(|err| FetchError::Unreachable(format!("{url}: {err}")))?;
        read_success_body(url, resp)
    }

    fn get_html(&self, url: &str) -> Result<String, FetchError> {
        debug!(url, "fetching upstream html page");
        let resp = self
            .client
            .get(url)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .send()
            .map_err(|err| FetchError::Unreachable(format!("{url}: {err}")))?;
        read_success_body(url, resp)
    }
}

fn read_success_body(url: &str, resp: Response) -> Result<String, FetchError> {
    let status = resp.status();
    let body = resp
        .text()
        .map_err(|err| FetchError::Unreachable(format!("failed reading body from {url}: {err}")))?;
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
            snippet: snippet(&body),
        });
    }
    Ok(body)
}

pub(crate) fn snippet(body: &str) -> String {
    body.trim()
        .replace(['\n', '\r'], " ")
        .chars()
        .take(SNIPPET_CHARS)
        .collect()
}
