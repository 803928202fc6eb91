use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::config::LottoConfig;
use crate::drawing::{Drawing, PrizeInfo, parse_request_date};
use crate::error::{CheckError, ErrorClass, FetchError};
use crate::game::Game;
use crate::megamillions::MegaMillions;
use crate::powerball::Powerball;
use crate::prize::{self, MultipliedPrize, ResolvedPrize};
use crate::ticket::{Ticket, TicketResult, evaluate};
use crate::upstream::Upstream;

/// Everything that differs between supported lotteries: where draws come
/// from and how prizes are paid.
pub trait LotteryGame: Sync {
    fn game(&self) -> Game;

    fn fetch_drawing(
        &self,
        upstream: &dyn Upstream,
        cfg: &LottoConfig,
        date: NaiveDate,
    ) -> Result<Drawing, FetchError>;

    fn fetch_prize_info(
        &self,
        upstream: &dyn Upstream,
        cfg: &LottoConfig,
        date: NaiveDate,
    ) -> Result<PrizeInfo, FetchError>;

    fn resolve_prize(&self, match_count: u8, bonus_match: bool, jackpot: &str) -> ResolvedPrize {
        prize::resolve_prize(match_count, bonus_match, self.game(), jackpot)
    }

    fn apply_multiplier(&self, base_cents: u64, multiplier: u8) -> MultipliedPrize {
        prize::apply_multiplier(base_cents, multiplier, self.game())
    }
}

static MEGA_MILLIONS: MegaMillions = MegaMillions;
static POWERBALL: Powerball = Powerball;

pub fn game_source(game: Game) -> &'static dyn LotteryGame {
    match game {
        Game::MegaMillions => &MEGA_MILLIONS,
        Game::Powerball => &POWERBALL,
    }
}

/// Tagged result handed to whatever surface sits in front of the core.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Envelope<T> {
    Success {
        date: String,
        game: String,
        data: T,
    },
    Failure {
        date: String,
        game: String,
        class: ErrorClass,
        error: String,
    },
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    fn from_result<E: std::fmt::Display>(
        date: &str,
        game: &str,
        result: Result<T, E>,
        class_of: impl Fn(&E) -> ErrorClass,
    ) -> Self {
        match result {
            Ok(data) => Envelope::Success {
                date: date.to_string(),
                game: game.to_string(),
                data,
            },
            Err(err) => Envelope::Failure {
                date: date.to_string(),
                game: game.to_string(),
                class: class_of(&err),
                error: err.to_string(),
            },
        }
    }
}

/// Validates the request before any upstream traffic.
fn resolve_request(date: &str, game: &str) -> Result<(NaiveDate, Game), FetchError> {
    let game = game.parse::<Game>()?;
    let date = parse_request_date(date)?;
    Ok((date, game))
}

pub fn fetch_drawing(
    upstream: &dyn Upstream,
    cfg: &LottoConfig,
    date: &str,
    game: &str,
) -> Result<Drawing, FetchError> {
    let (date, game) = resolve_request(date, game)?;
    let drawing = game_source(game).fetch_drawing(upstream, cfg, date)?;
    info!(
        %game,
        %date,
        provenance = ?drawing.provenance,
        "drawing retrieved"
    );
    Ok(drawing)
}

pub fn fetch_prize_info(
    upstream: &dyn Upstream,
    cfg: &LottoConfig,
    date: &str,
    game: &str,
) -> Result<PrizeInfo, FetchError> {
    let (date, game) = resolve_request(date, game)?;
    game_source(game).fetch_prize_info(upstream, cfg, date)
}

#[derive(Debug, Clone)]
pub struct TicketCheckRequest {
    pub date: String,
    pub game: String,
    pub primary: Vec<u8>,
    pub bonus: u8,
    pub multiplier: u8,
    pub jackpot: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketCheckReport {
    pub ticket: Ticket,
    pub drawing: Drawing,
    pub result: TicketResult,
}

/// Validates the ticket, fetches the drawing for its date, then evaluates.
pub fn check_ticket_for_date(
    upstream: &dyn Upstream,
    cfg: &LottoConfig,
    req: &TicketCheckRequest,
) -> Result<TicketCheckReport, CheckError> {
    let (date, game) = resolve_request(&req.date, &req.game)?;
    let ticket = Ticket::new(game, &req.primary, req.bonus, req.multiplier)?;
    let drawing = game_source(game).fetch_drawing(upstream, cfg, date)?;

    let jackpot = req
        .jackpot
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| drawing.jackpot.as_ref().map(|j| j.estimated.as_str()))
        .unwrap_or(cfg.default_jackpot.as_str())
        .to_string();
    let result = evaluate(&ticket, &drawing, &jackpot);
    info!(
        %game,
        %date,
        matches = result.match_count,
        bonus = result.bonus_match,
        winner = result.is_winner,
        "ticket checked"
    );

    Ok(TicketCheckReport {
        ticket,
        drawing,
        result,
    })
}

pub fn drawing_envelope(
    upstream: &dyn Upstream,
    cfg: &LottoConfig,
    date: &str,
    game: &str,
) -> Envelope<Drawing> {
    Envelope::from_result(
        date,
        game,
        fetch_drawing(upstream, cfg, date, game),
        FetchError::class,
    )
}

pub fn prize_info_envelope(
    upstream: &dyn Upstream,
    cfg: &LottoConfig,
    date: &str,
    game: &str,
) -> Envelope<PrizeInfo> {
    Envelope::from_result(
        date,
        game,
        fetch_prize_info(upstream, cfg, date, game),
        FetchError::class,
    )
}

pub fn ticket_envelope(
    upstream: &dyn Upstream,
    cfg: &LottoConfig,
    req: &TicketCheckRequest,
) -> Envelope<TicketCheckReport> {
    Envelope::from_result(
        &req.date,
        &req.game,
        check_ticket_for_date(upstream, cfg, req),
        CheckError::class,
    )
}
