use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

use crate::config::LottoConfig;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client. The first caller's config fixes the timeout and
/// user agent for the life of the process.
pub fn http_client(cfg: &LottoConfig) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .user_agent(cfg.user_agent.clone())
            .gzip(true)
            .build()
            .context("failed to build http client")
    })
}
