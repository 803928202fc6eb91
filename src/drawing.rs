use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::FetchError;
use crate::game::{Game, Tier};

/// Request-side date text, e.g. `08/27/2025`.
pub const REQUEST_DATE_FORMAT: &str = "%m/%d/%Y";

static REQUEST_DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("literal regex"));

/// Accepts only the strict `MM/DD/YYYY` shape and a real calendar date.
pub fn parse_request_date(raw: &str) -> Result<NaiveDate, FetchError> {
    let trimmed = raw.trim();
    if !REQUEST_DATE_SHAPE.is_match(trimmed) {
        return Err(FetchError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, REQUEST_DATE_FORMAT)
        .map_err(|_| FetchError::InvalidDate(trimmed.to_string()))
}

/// Which retrieval path produced a drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Mega Millions detail call (authoritative).
    MegaMillionsDetail,
    /// Mega Millions paging call only; detail call failed.
    MegaMillionsPaging,
    PowerballScrape,
}

impl Provenance {
    pub fn is_degraded(self) -> bool {
        matches!(self, Provenance::MegaMillionsPaging)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JackpotSummary {
    pub estimated: String,
    pub cash_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drawing {
    pub game: Game,
    pub draw_date: NaiveDate,
    pub primary: [u8; 5],
    pub bonus: u8,
    pub multiplier: Option<u8>,
    pub jackpot: Option<JackpotSummary>,
    pub provenance: Provenance,
    pub retrieved_at: DateTime<Utc>,
}

impl Drawing {
    /// Builds a drawing from raw upstream integers, enforcing the game's
    /// ranges and distinctness. Anything else is a malformed payload.
    pub fn from_upstream(
        game: Game,
        draw_date: NaiveDate,
        primary: &[i64],
        bonus: i64,
        multiplier: Option<i64>,
        provenance: Provenance,
    ) -> Result<Drawing, FetchError> {
        let rules = game.rules();
        if primary.len() != 5 {
            return Err(FetchError::Malformed(format!(
                "expected 5 primary numbers, got {}",
                primary.len()
            )));
        }

        let mut numbers = [0u8; 5];
        let mut seen = HashSet::with_capacity(5);
        for (slot, raw) in numbers.iter_mut().zip(primary) {
            let value = in_range(*raw, rules.primary_max).ok_or_else(|| {
                FetchError::Malformed(format!(
                    "primary number {raw} outside 1..={}",
                    rules.primary_max
                ))
            })?;
            if !seen.insert(value) {
                return Err(FetchError::Malformed(format!(
                    "primary number {value} repeated"
                )));
            }
            *slot = value;
        }

        let bonus = in_range(bonus, rules.bonus_max).ok_or_else(|| {
            FetchError::Malformed(format!(
                "{} {bonus} outside 1..={}",
                rules.bonus_name, rules.bonus_max
            ))
        })?;

        // Upstreams report "not drawn" as -1 or 0.
        let multiplier = multiplier
            .filter(|m| *m > 0)
            .and_then(|m| u8::try_from(m).ok());

        Ok(Drawing {
            game,
            draw_date,
            primary: numbers,
            bonus,
            multiplier,
            jackpot: None,
            provenance,
            retrieved_at: Utc::now(),
        })
    }

    pub fn with_jackpot(mut self, jackpot: Option<JackpotSummary>) -> Self {
        self.jackpot = jackpot;
        self
    }
}

fn in_range(raw: i64, max: u8) -> Option<u8> {
    u8::try_from(raw).ok().filter(|v| (1..=max).contains(v))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrizeTierRow {
    pub tier: Tier,
    pub label: String,
    pub winners: u64,
    pub prize: String,
    pub multiplier_winners: u64,
    pub multiplier_prize: String,
    /// Set when the row was assigned by table position and its displayed
    /// prize disagrees with the paytable amount for that position.
    pub position_mismatch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrizeInfo {
    pub game: Game,
    pub draw_date: NaiveDate,
    pub estimated_jackpot: String,
    pub cash_value: String,
    pub tiers: Vec<PrizeTierRow>,
    pub provenance: Provenance,
    pub retrieved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{Drawing, Provenance, parse_request_date};
    use crate::error::FetchError;
    use crate::game::Game;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 27).expect("valid date")
    }

    #[test]
    fn request_date_requires_strict_shape() {
        assert_eq!(parse_request_date("08/27/2025"), Ok(day()));
        assert!(matches!(
            parse_request_date("13/45/2025"),
            Err(FetchError::InvalidDate(_))
        ));
        assert!(parse_request_date("8/27/2025").is_err());
        assert!(parse_request_date("2025-08-27").is_err());
        assert!(parse_request_date("02/30/2025").is_err());
    }

    #[test]
    fn upstream_numbers_are_range_checked() {
        let ok = Drawing::from_upstream(
            Game::Powerball,
            day(),
            &[10, 20, 30, 40, 50],
            25,
            Some(-1),
            Provenance::PowerballScrape,
        )
        .expect("valid drawing");
        assert_eq!(ok.primary, [10, 20, 30, 40, 50]);
        assert_eq!(ok.multiplier, None);

        let too_big = Drawing::from_upstream(
            Game::Powerball,
            day(),
            &[10, 20, 30, 40, 70],
            25,
            None,
            Provenance::PowerballScrape,
        );
        assert!(matches!(too_big, Err(FetchError::Malformed(_))));

        let dup = Drawing::from_upstream(
            Game::MegaMillions,
            day(),
            &[10, 10, 30, 40, 50],
            5,
            None,
            Provenance::MegaMillionsDetail,
        );
        assert!(matches!(dup, Err(FetchError::Malformed(_))));

        let bad_bonus = Drawing::from_upstream(
            Game::MegaMillions,
            day(),
            &[10, 20, 30, 40, 50],
            26,
            None,
            Provenance::MegaMillionsDetail,
        );
        assert!(bad_bonus.is_err());
    }
}
