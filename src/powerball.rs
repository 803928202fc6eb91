//! Powerball draws scraped from the public draw-result page.
//!
//! The page has no API behind it, so every field is pulled out with a
//! pattern. Balls are mandatory; Power Play, title date and jackpot text are
//! best effort. The prize table is read through progressively looser
//! strategies and, failing all of them, synthesized from the paytable.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::LottoConfig;
use crate::drawing::{Drawing, JackpotSummary, PrizeInfo, PrizeTierRow, Provenance};
use crate::error::FetchError;
use crate::game::{Game, POWER_PLAY_CAP_THRESHOLD_CENTS, Tier};
use crate::lottery::LotteryGame;
use crate::prize::{apply_multiplier, format_cents_whole};
use crate::upstream::Upstream;

const URL_DATE_FORMAT: &str = "%Y-%m-%d";
const TITLE_DATE_FORMAT: &str = "%a, %b %d, %Y";
const GRAND_PRIZE: &str = "Grand Prize";
/// Power Play column of the synthesized table. The $1,000,000 tier pays a
/// flat 2x under Power Play instead.
const PLACEHOLDER_MULTIPLIER: u8 = 4;
const PLACEHOLDER_TOP_TIER_MULTIPLIER: u8 = 2;

const LABEL_WINNERS: &str = "Powerball Winners";
const LABEL_PRIZE: &str = "Powerball Prize";
const LABEL_PP_WINNERS: &str = "Power Play Winners";
const LABEL_PP_PRIZE: &str = "Power Play Prize";

fn literal(pattern: &str) -> Regex {
    Regex::new(pattern).expect("literal regex")
}

static WHITE_BALL: Lazy<Regex> = Lazy::new(|| {
    literal(r#"<div class="form-control col white-balls item-powerball">\s*(\d+)\s*</div>"#)
});
static POWERBALL: Lazy<Regex> = Lazy::new(|| {
    literal(r#"<div class="form-control col powerball item-powerball">\s*(\d+)\s*</div>"#)
});
static MULTIPLIER: Lazy<Regex> =
    Lazy::new(|| literal(r#"<span class="multiplier">\s*(\d+)x\s*</span>"#));
static TITLE_DATE: Lazy<Regex> = Lazy::new(|| {
    literal(r#"<h5 class="card-title mx-auto mb-3 lh-1 text-center\s+title-date">\s*([^<]+?)\s*</h5>"#)
});

static JACKPOT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"<span class="prize-label">\s*Estimated Jackpot:\s*</span>\s*<span>([^<]+)</span>"#,
        r"Estimated Jackpot[^<]*<[^>]*>([^<]+)</[^>]*>",
        r"Jackpot[^<]*<[^>]*>([^<]+)</[^>]*>",
        r"(\$[\d,]+(?:\.\d{2})?\s*[Mm]illion)",
    ]
    .into_iter()
    .map(literal)
    .collect()
});
static CASH_VALUE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"<span class="prize-label">\s*Cash Value:\s*</span>\s*<span>([^<]+)</span>"#,
        r"Cash Value[^<]*<[^>]*>([^<]+)</[^>]*>",
        r"Cash[^<]*<[^>]*>([^<]+)</[^>]*>",
    ]
    .into_iter()
    .map(literal)
    .collect()
});

static PRIZE_ROW: Lazy<Regex> = Lazy::new(|| {
    literal(concat!(
        r#"(?s)<tr>\s*<td[^>]*data-label="Match"[^>]*>.*?item-powerball\s+([^"\s]+)[^>]*>.*?</td>\s*"#,
        r#"<td[^>]*data-label="Powerball Winners"[^>]*>\s*([\d,]*)\s*</td>\s*"#,
        r#"<td[^>]*data-label="Powerball Prize"[^>]*>\s*([^<]+?)\s*</td>\s*"#,
        r#"<td[^>]*data-label="Power Play Winners"[^>]*>\s*([\d,]*)\s*</td>\s*"#,
        r#"<td[^>]*data-label="Power Play Prize"[^>]*>\s*([^<]*?)\s*</td>\s*</tr>"#,
    ))
});
static LABELED_CELL: Lazy<Regex> =
    Lazy::new(|| literal(r#"<td[^>]*data-label="([^"]*)"[^>]*>\s*([^<]*?)\s*</td>"#));

pub struct Powerball;

impl LotteryGame for Powerball {
    fn game(&self) -> Game {
        Game::Powerball
    }

    fn fetch_drawing(
        &self,
        upstream: &dyn Upstream,
        cfg: &LottoConfig,
        date: NaiveDate,
    ) -> Result<Drawing, FetchError> {
        let html = upstream.get_html(&draw_page_url(cfg, date))?;
        parse_draw_page(&html, date)
    }

    fn fetch_prize_info(
        &self,
        upstream: &dyn Upstream,
        cfg: &LottoConfig,
        date: NaiveDate,
    ) -> Result<PrizeInfo, FetchError> {
        let html = upstream.get_html(&draw_page_url(cfg, date))?;
        Ok(parse_prize_page(&html, date))
    }
}

pub fn draw_page_url(cfg: &LottoConfig, date: NaiveDate) -> String {
    format!(
        "{}/draw-result?gc=powerball&date={}&oc=fl",
        cfg.powerball_base_url,
        date.format(URL_DATE_FORMAT)
    )
}

pub fn parse_draw_page(html: &str, requested: NaiveDate) -> Result<Drawing, FetchError> {
    let whites: Vec<i64> = WHITE_BALL
        .captures_iter(html)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<i64>().ok())
        .take(5)
        .collect();
    if whites.len() < 5 {
        return Err(FetchError::NoData(format!(
            "could not find all 5 white ball numbers, found {}",
            whites.len()
        )));
    }

    let powerball = first_capture(&POWERBALL, html)
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| FetchError::NoData("could not find Powerball number".to_string()))?;

    let power_play = first_capture(&MULTIPLIER, html).and_then(|s| s.parse::<i64>().ok());
    if power_play.is_none() {
        debug!(%requested, "no power play multiplier on page");
    }

    let draw_date = title_date(html, requested);
    let jackpot = first_match(&JACKPOT_PATTERNS, html).map(|estimated| JackpotSummary {
        estimated,
        cash_value: first_match(&CASH_VALUE_PATTERNS, html),
    });

    let drawing = Drawing::from_upstream(
        Game::Powerball,
        draw_date,
        &whites,
        powerball,
        power_play,
        Provenance::PowerballScrape,
    )?;
    Ok(drawing.with_jackpot(jackpot))
}

pub fn parse_prize_page(html: &str, requested: NaiveDate) -> PrizeInfo {
    PrizeInfo {
        game: Game::Powerball,
        draw_date: title_date(html, requested),
        estimated_jackpot: first_match(&JACKPOT_PATTERNS, html).unwrap_or_default(),
        cash_value: first_match(&CASH_VALUE_PATTERNS, html).unwrap_or_default(),
        tiers: extract_prize_tiers(html),
        provenance: Provenance::PowerballScrape,
        retrieved_at: Utc::now(),
    }
}

/// Structured rows first, then label-grouped cells read by position, then
/// the synthesized paytable.
pub fn extract_prize_tiers(html: &str) -> Vec<PrizeTierRow> {
    let rows = structured_rows(html);
    if !rows.is_empty() {
        return rows;
    }

    let rows = grouped_rows(html);
    if !rows.is_empty() {
        warn!(rows = rows.len(), "powerball prize table read by position");
        return rows;
    }

    warn!("powerball prize table not found, using placeholder paytable");
    placeholder_rows()
}

fn structured_rows(html: &str) -> Vec<PrizeTierRow> {
    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    let mut repeated = 0usize;
    for (idx, caps) in PRIZE_ROW.captures_iter(html).enumerate() {
        let text = |i: usize| caps.get(i).map(|m| m.as_str().trim()).unwrap_or_default();
        let prize = text(3).to_string();

        let (tier, position_mismatch) = match Tier::from_class_token(text(1)) {
            Some(Tier::NoPrize) => {
                debug!(token = text(1), "skipping non-winning prize row");
                continue;
            }
            Some(tier) => (tier, false),
            None => positional_tier(idx, &prize),
        };
        if tier == Tier::NoPrize || !seen.insert(tier) {
            repeated += 1;
            continue;
        }

        rows.push(PrizeTierRow {
            tier,
            label: tier.label().to_string(),
            winners: parse_count(text(2)),
            prize,
            multiplier_winners: parse_count(text(4)),
            multiplier_prize: text(5).to_string(),
            position_mismatch,
        });
    }
    if repeated > 0 {
        warn!(repeated, "powerball prize table repeats tiers, keeping the first of each");
    }
    rows
}

fn grouped_rows(html: &str) -> Vec<PrizeTierRow> {
    let mut groups: HashMap<String, Vec<String>> = HashMap::new();
    for caps in LABELED_CELL.captures_iter(html) {
        let (Some(label), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        groups
            .entry(label.as_str().trim().to_string())
            .or_default()
            .push(value.as_str().trim().to_string());
    }

    let columns = [LABEL_WINNERS, LABEL_PRIZE, LABEL_PP_WINNERS, LABEL_PP_PRIZE]
        .map(|label| groups.get(label));
    let [Some(winners), Some(prizes), Some(pp_winners), Some(pp_prizes)] = columns else {
        return Vec::new();
    };

    let len = winners
        .len()
        .min(prizes.len())
        .min(pp_winners.len())
        .min(pp_prizes.len());
    if len > Tier::CANONICAL.len() {
        warn!(rows = len, "powerball prize table has extra rows, ignoring the tail");
    }

    (0..len.min(Tier::CANONICAL.len()))
        .map(|idx| {
            let (tier, position_mismatch) = positional_tier(idx, &prizes[idx]);
            PrizeTierRow {
                tier,
                label: tier.label().to_string(),
                winners: parse_count(&winners[idx]),
                prize: prizes[idx].clone(),
                multiplier_winners: parse_count(&pp_winners[idx]),
                multiplier_prize: pp_prizes[idx].clone(),
                position_mismatch,
            }
        })
        .collect()
}

/// Tiers are assigned by table position, since several tiers share a
/// displayed amount ($100 for 4+0 and 3+1). A row whose prize disagrees
/// with the paytable at its position is flagged rather than trusted.
fn positional_tier(idx: usize, prize: &str) -> (Tier, bool) {
    let Some(tier) = Tier::CANONICAL.get(idx).copied() else {
        warn!(idx, prize, "prize row beyond canonical table");
        return (Tier::NoPrize, true);
    };
    let agrees = expected_prize_text(tier)
        .map(|expected| expected == prize.trim())
        .unwrap_or_else(|| !is_fixed_amount(prize));
    if !agrees {
        warn!(idx, tier = tier.label(), prize, "prize row disagrees with its position");
    }
    (tier, !agrees)
}

fn expected_prize_text(tier: Tier) -> Option<String> {
    if tier == Tier::Jackpot {
        return None;
    }
    Some(format_cents_whole(Game::Powerball.rules().base_cents(tier)))
}

fn is_fixed_amount(prize: &str) -> bool {
    Game::Powerball
        .rules()
        .paytable
        .iter()
        .filter(|e| e.tier != Tier::Jackpot)
        .any(|e| format_cents_whole(e.base_cents) == prize.trim())
}

fn placeholder_rows() -> Vec<PrizeTierRow> {
    Game::Powerball
        .rules()
        .paytable
        .iter()
        .map(|entry| {
            let (prize, multiplier_prize) = if entry.tier == Tier::Jackpot {
                (GRAND_PRIZE.to_string(), String::new())
            } else {
                let multiplier = if entry.base_cents >= POWER_PLAY_CAP_THRESHOLD_CENTS {
                    PLACEHOLDER_TOP_TIER_MULTIPLIER
                } else {
                    PLACEHOLDER_MULTIPLIER
                };
                let multiplied = apply_multiplier(entry.base_cents, multiplier, Game::Powerball);
                (
                    format_cents_whole(entry.base_cents),
                    format_cents_whole(multiplied.amount_cents),
                )
            };
            PrizeTierRow {
                tier: entry.tier,
                label: entry.tier.label().to_string(),
                winners: 0,
                prize,
                multiplier_winners: 0,
                multiplier_prize,
                position_mismatch: false,
            }
        })
        .collect()
}

fn title_date(html: &str, requested: NaiveDate) -> NaiveDate {
    match first_capture(&TITLE_DATE, html) {
        Some(text) => match NaiveDate::parse_from_str(&text, TITLE_DATE_FORMAT) {
            Ok(shown) => {
                if shown != requested {
                    warn!(%requested, %shown, "powerball page shows a different draw date");
                }
                shown
            }
            Err(_) => {
                warn!(title = %text, "unparseable powerball title date, using requested date");
                requested
            }
        },
        None => {
            debug!(%requested, "powerball title date missing, using requested date");
            requested
        }
    }
}

fn first_capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

fn first_match(patterns: &[Regex], html: &str) -> Option<String> {
    patterns
        .iter()
        .filter_map(|re| first_capture(re, html))
        .find(|s| !s.is_empty())
}

fn parse_count(raw: &str) -> u64 {
    raw.replace(',', "").trim().parse().unwrap_or(0)
}
