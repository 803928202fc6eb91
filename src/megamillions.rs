//! Mega Millions draws via the site's ASMX utility service.
//!
//! Two calls, strictly in order: `GetDrawingPagingData` turns a date into a
//! `PlayDateTicks` key plus an inline copy of the draw, then
//! `GetDrawDataByTickWithMatrix` returns the full record with jackpot
//! figures. Both wrap their payload as a JSON string inside `{"d": ...}`.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::LottoConfig;
use crate::drawing::{Drawing, JackpotSummary, PrizeInfo, PrizeTierRow, Provenance};
use crate::error::FetchError;
use crate::game::{Game, Tier};
use crate::lottery::LotteryGame;
use crate::prize::format_cents_whole;
use crate::upstream::Upstream;

const PAGING_PATH: &str = "GetDrawingPagingData";
const DETAIL_PATH: &str = "GetDrawDataByTickWithMatrix";
const PAGE_SIZE: u32 = 20;
const API_DATE_FORMAT: &str = "%m/%d/%Y";
const PLAY_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const UNKNOWN: &str = "Unknown";

pub struct MegaMillions;

impl LotteryGame for MegaMillions {
    fn game(&self) -> Game {
        Game::MegaMillions
    }

    fn fetch_drawing(
        &self,
        upstream: &dyn Upstream,
        cfg: &LottoConfig,
        date: NaiveDate,
    ) -> Result<Drawing, FetchError> {
        let row = fetch_paging_row(upstream, cfg, date)?;

        match fetch_detail(upstream, cfg, row.play_date_ticks)
            .and_then(|detail| drawing_from_detail(&detail, date))
        {
            Ok(drawing) => Ok(drawing),
            Err(err) => {
                warn!(
                    %date,
                    ticks = row.play_date_ticks,
                    error = %err,
                    "mega millions detail unavailable, using paging copy"
                );
                drawing_from_row(&row, date, Provenance::MegaMillionsPaging)
            }
        }
    }

    fn fetch_prize_info(
        &self,
        upstream: &dyn Upstream,
        cfg: &LottoConfig,
        date: NaiveDate,
    ) -> Result<PrizeInfo, FetchError> {
        let row = fetch_paging_row(upstream, cfg, date)?;
        let detail = fetch_detail(upstream, cfg, row.play_date_ticks)?;
        let draw_date = parse_play_date(&row.play_date).unwrap_or(date);
        Ok(prize_info_from_detail(&detail, draw_date))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DrawRow {
    #[serde(default)]
    pub play_date: String,
    #[serde(default)]
    pub play_date_ticks: i64,
    #[serde(rename = "N1")]
    pub n1: i64,
    #[serde(rename = "N2")]
    pub n2: i64,
    #[serde(rename = "N3")]
    pub n3: i64,
    #[serde(rename = "N4")]
    pub n4: i64,
    #[serde(rename = "N5")]
    pub n5: i64,
    #[serde(rename = "MBall")]
    pub mball: i64,
    #[serde(default)]
    pub megaplier: Option<i64>,
}

impl DrawRow {
    fn primary(&self) -> [i64; 5] {
        [self.n1, self.n2, self.n3, self.n4, self.n5]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagingData {
    #[serde(rename = "DrawingData", default)]
    pub rows: Vec<DrawRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailData {
    #[serde(rename = "Drawing")]
    pub drawing: DrawRow,
    #[serde(rename = "Jackpot", default)]
    pub jackpot: Option<JackpotField>,
}

/// The `Jackpot` field has shipped as a plain string, a bare number and an
/// object with pool figures depending on deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JackpotField {
    Pool(JackpotPool),
    Amount(f64),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Debug, Clone, Deserialize)]
pub struct JackpotPool {
    #[serde(rename = "CurrentPrizePool", default)]
    pub prize_pool: Option<PoolFigure>,
    #[serde(rename = "CurrentCashValue", default)]
    pub cash_value: Option<PoolFigure>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PoolFigure {
    Amount(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    d: Value,
}

fn fetch_paging_row(
    upstream: &dyn Upstream,
    cfg: &LottoConfig,
    date: NaiveDate,
) -> Result<DrawRow, FetchError> {
    let api_date = date.format(API_DATE_FORMAT).to_string();
    let url = format!("{}/{PAGING_PATH}", cfg.megamillions_api_base);
    let body = json!({
        "endDate": api_date,
        "pageNumber": 1,
        "pageSize": PAGE_SIZE,
        "startDate": api_date,
    });
    let raw = upstream.post_json(&url, &body)?;
    let paging = parse_paging_response(&raw)?;
    debug!(%date, rows = paging.rows.len(), "mega millions paging data");

    paging.rows.into_iter().next().ok_or_else(|| {
        FetchError::NoData(format!("no Mega Millions drawing found for {api_date}"))
    })
}

fn fetch_detail(
    upstream: &dyn Upstream,
    cfg: &LottoConfig,
    play_date_ticks: i64,
) -> Result<DetailData, FetchError> {
    let url = format!("{}/{DETAIL_PATH}", cfg.megamillions_api_base);
    let body = json!({ "PlayDateTicks": play_date_ticks });
    let raw = upstream.post_json(&url, &body)?;
    parse_detail_response(&raw)
}

pub fn parse_paging_response(raw: &str) -> Result<PagingData, FetchError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(PagingData { rows: Vec::new() });
    }
    match unwrap_envelope(trimmed, "paging")? {
        Value::Null => Ok(PagingData { rows: Vec::new() }),
        inner => from_inner(inner, "paging"),
    }
}

pub fn parse_detail_response(raw: &str) -> Result<DetailData, FetchError> {
    let inner = unwrap_envelope(raw.trim(), "detail")?;
    if inner.is_null() {
        return Err(FetchError::Malformed("empty detail payload".to_string()));
    }
    from_inner(inner, "detail")
}

/// Peels the `{"d": "<json>"}` wrapper. Some deployments already return
/// `d` as an object, so both shapes are accepted.
fn unwrap_envelope(raw: &str, what: &str) -> Result<Value, FetchError> {
    let outer: Envelope = serde_json::from_str(raw)
        .map_err(|err| FetchError::Malformed(format!("invalid {what} envelope: {err}")))?;
    match outer.d {
        Value::String(encoded) => {
            let encoded = encoded.trim();
            if encoded.is_empty() || encoded == "null" {
                return Ok(Value::Null);
            }
            serde_json::from_str(encoded)
                .map_err(|err| FetchError::Malformed(format!("invalid {what} payload: {err}")))
        }
        other => Ok(other),
    }
}

fn from_inner<T: DeserializeOwned>(inner: Value, what: &str) -> Result<T, FetchError> {
    serde_json::from_value(inner)
        .map_err(|err| FetchError::Malformed(format!("unexpected {what} shape: {err}")))
}

fn drawing_from_row(
    row: &DrawRow,
    requested: NaiveDate,
    provenance: Provenance,
) -> Result<Drawing, FetchError> {
    let draw_date = parse_play_date(&row.play_date).unwrap_or(requested);
    Drawing::from_upstream(
        Game::MegaMillions,
        draw_date,
        &row.primary(),
        row.mball,
        row.megaplier,
        provenance,
    )
}

fn drawing_from_detail(detail: &DetailData, requested: NaiveDate) -> Result<Drawing, FetchError> {
    let drawing = drawing_from_row(&detail.drawing, requested, Provenance::MegaMillionsDetail)?;
    Ok(drawing.with_jackpot(Some(JackpotSummary {
        estimated: jackpot_display(detail.jackpot.as_ref()),
        cash_value: cash_value_display(detail.jackpot.as_ref()),
    })))
}

fn prize_info_from_detail(detail: &DetailData, draw_date: NaiveDate) -> PrizeInfo {
    let jackpot = jackpot_display(detail.jackpot.as_ref());
    let rules = Game::MegaMillions.rules();
    let tiers = rules
        .paytable
        .iter()
        .map(|entry| PrizeTierRow {
            tier: entry.tier,
            label: entry.tier.label().to_string(),
            winners: 0,
            prize: if entry.tier == Tier::Jackpot {
                jackpot.clone()
            } else {
                format_cents_whole(entry.base_cents)
            },
            multiplier_winners: 0,
            multiplier_prize: String::new(),
            position_mismatch: false,
        })
        .collect();

    PrizeInfo {
        game: Game::MegaMillions,
        draw_date,
        estimated_jackpot: jackpot,
        cash_value: cash_value_display(detail.jackpot.as_ref()).unwrap_or_default(),
        tiers,
        provenance: Provenance::MegaMillionsDetail,
        retrieved_at: Utc::now(),
    }
}

fn parse_play_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDateTime::parse_from_str(trimmed, PLAY_DATE_FORMAT)
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}

/// Resolves the jackpot to display text. Precedence: pool object with a
/// prize-pool figure, bare number, plain string, then "Unknown".
pub fn jackpot_display(jackpot: Option<&JackpotField>) -> String {
    match jackpot {
        Some(JackpotField::Pool(pool)) => match &pool.prize_pool {
            Some(PoolFigure::Amount(v)) => bucket_whole(*v),
            Some(PoolFigure::Text(s)) if !s.trim().is_empty() => s.trim().to_string(),
            _ => UNKNOWN.to_string(),
        },
        Some(JackpotField::Amount(v)) => bucket_whole(*v),
        Some(JackpotField::Text(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Cash value only exists on the pool object form.
pub fn cash_value_display(jackpot: Option<&JackpotField>) -> Option<String> {
    let Some(JackpotField::Pool(pool)) = jackpot else {
        return None;
    };
    match pool.cash_value.as_ref()? {
        PoolFigure::Amount(v) if *v >= 1_000_000.0 => {
            Some(format!("${:.1} Million", v / 1_000_000.0))
        }
        PoolFigure::Amount(v) => Some(bucket_whole(*v)),
        PoolFigure::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
    }
}

fn bucket_whole(v: f64) -> String {
    if v >= 1_000_000.0 {
        format!("${:.0} Million", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("${:.0} Thousand", v / 1_000.0)
    } else {
        format!("${v:.0}")
    }
}
