use std::collections::HashSet;

use serde::Serialize;

use crate::drawing::Drawing;
use crate::error::TicketError;
use crate::game::{Game, Tier};
use crate::lottery::game_source;

/// A validated player ticket. Construction rejects malformed input rather
/// than normalizing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub game: Game,
    pub primary: [u8; 5],
    pub bonus: u8,
    /// 0 when no multiplier was purchased.
    pub multiplier: u8,
}

impl Ticket {
    pub fn new(game: Game, primary: &[u8], bonus: u8, multiplier: u8) -> Result<Self, TicketError> {
        let rules = game.rules();
        if primary.len() != 5 {
            return Err(TicketError::WrongCount(primary.len()));
        }

        let mut numbers = [0u8; 5];
        let mut seen = HashSet::with_capacity(5);
        for (slot, value) in numbers.iter_mut().zip(primary.iter().copied()) {
            if !(1..=rules.primary_max).contains(&value) {
                return Err(TicketError::PrimaryOutOfRange {
                    value,
                    max: rules.primary_max,
                });
            }
            if !seen.insert(value) {
                return Err(TicketError::Duplicate(value));
            }
            *slot = value;
        }

        if !(1..=rules.bonus_max).contains(&bonus) {
            return Err(TicketError::BonusOutOfRange {
                value: bonus,
                max: rules.bonus_max,
            });
        }
        if !rules.is_legal_multiplier(multiplier) {
            return Err(TicketError::IllegalMultiplier {
                value: multiplier,
                allowed: rules.allowed_multipliers_text(),
            });
        }

        Ok(Self {
            game,
            primary: numbers,
            bonus,
            multiplier,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketResult {
    pub game: Game,
    pub tier: Tier,
    pub match_count: u8,
    pub bonus_match: bool,
    pub prize_description: String,
    pub base_cents: u64,
    pub requested_multiplier: u8,
    pub applied_multiplier: u8,
    pub total_cents: u64,
    pub total_display: String,
    pub is_winner: bool,
}

pub fn count_matches(ticket: &[u8; 5], drawn: &[u8; 5]) -> u8 {
    let drawn: HashSet<u8> = drawn.iter().copied().collect();
    ticket
        .iter()
        .copied()
        .collect::<HashSet<u8>>()
        .intersection(&drawn)
        .count() as u8
}

/// Evaluates raw ticket numbers against a drawing of the same game.
pub fn check_ticket(
    primary: &[u8],
    bonus: u8,
    drawing: &Drawing,
    multiplier: u8,
    jackpot_display: &str,
) -> Result<TicketResult, TicketError> {
    let ticket = Ticket::new(drawing.game, primary, bonus, multiplier)?;
    Ok(evaluate(&ticket, drawing, jackpot_display))
}

/// Pure evaluation of an already validated ticket.
pub fn evaluate(ticket: &Ticket, drawing: &Drawing, jackpot_display: &str) -> TicketResult {
    let source = game_source(drawing.game);
    let match_count = count_matches(&ticket.primary, &drawing.primary);
    let bonus_match = ticket.bonus == drawing.bonus;

    let prize = source.resolve_prize(match_count, bonus_match, jackpot_display);
    let multiplied = source.apply_multiplier(prize.base_cents, ticket.multiplier);
    let is_winner = prize.base_cents > 0 || prize.tier == Tier::Jackpot;
    let total_display = if prize.tier == Tier::Jackpot {
        prize.description.clone()
    } else {
        multiplied.formatted
    };

    TicketResult {
        game: drawing.game,
        tier: prize.tier,
        match_count,
        bonus_match,
        prize_description: prize.description,
        base_cents: prize.base_cents,
        requested_multiplier: ticket.multiplier,
        applied_multiplier: multiplied.effective_multiplier,
        total_cents: multiplied.amount_cents,
        total_display,
        is_winner,
    }
}
