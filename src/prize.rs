use serde::Serialize;

use crate::game::{Game, GameRules, MultiplierRule, Tier};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPrize {
    pub tier: Tier,
    pub description: String,
    /// Zero for the jackpot (amount varies per draw) and for no prize.
    pub base_cents: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultipliedPrize {
    pub formatted: String,
    pub amount_cents: u64,
    /// Multiplier actually applied after the game's rule; 1 when none.
    pub effective_multiplier: u8,
}

pub fn resolve_prize(
    match_count: u8,
    bonus_match: bool,
    game: Game,
    jackpot_display: &str,
) -> ResolvedPrize {
    let tier = Tier::from_matches(match_count, bonus_match);
    let rules = game.rules();
    match tier {
        Tier::Jackpot => ResolvedPrize {
            tier,
            description: jackpot_display.to_string(),
            base_cents: 0,
        },
        Tier::NoPrize => ResolvedPrize {
            tier,
            description: "No Prize".to_string(),
            base_cents: 0,
        },
        _ => {
            let base_cents = rules.base_cents(tier);
            ResolvedPrize {
                tier,
                description: format_cents_whole(base_cents),
                base_cents,
            }
        }
    }
}

/// Multiplier the game actually pays for a requested stake add-on.
pub fn effective_multiplier(rules: &GameRules, base_cents: u64, requested: u8) -> u8 {
    if requested <= 1 {
        return 1;
    }
    match rules.multiplier_rule {
        MultiplierRule::Uniform => requested,
        MultiplierRule::CappedTop {
            threshold_cents,
            fallback,
        } => {
            if requested == rules.top_multiplier() && base_cents >= threshold_cents {
                fallback
            } else {
                requested
            }
        }
    }
}

pub fn apply_multiplier(base_cents: u64, multiplier: u8, game: Game) -> MultipliedPrize {
    let effective = effective_multiplier(game.rules(), base_cents, multiplier);
    let amount_cents = base_cents.saturating_mul(u64::from(effective));
    let formatted = if effective > 1 {
        format!("{} ({}x)", format_cents(amount_cents), effective)
    } else {
        format_cents(amount_cents)
    };
    MultipliedPrize {
        formatted,
        amount_cents,
        effective_multiplier: effective,
    }
}

/// `$1,234.56`
pub fn format_cents(cents: u64) -> String {
    format!("${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// `$50,000`, dropping the fraction; prize tables never show cents.
pub fn format_cents_whole(cents: u64) -> String {
    format!("${}", group_thousands(cents / 100))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct PaytableLine {
    pub tier: Tier,
    pub label: &'static str,
    pub description: &'static str,
    pub prize: String,
    pub base_cents: u64,
    /// `(requested multiplier, paid amount in cents)` for each legal add-on.
    pub multiplied: Vec<(u8, u64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaytableListing {
    pub game: Game,
    pub bonus_name: &'static str,
    pub multiplier_name: &'static str,
    pub multipliers: Vec<u8>,
    pub lines: Vec<PaytableLine>,
}

pub fn describe_paytable(game: Game, jackpot_display: &str) -> PaytableListing {
    let rules = game.rules();
    let multipliers: Vec<u8> = rules.multipliers.iter().copied().filter(|m| *m > 1).collect();
    let lines = rules
        .paytable
        .iter()
        .map(|entry| {
            let prize = if entry.tier == Tier::Jackpot {
                jackpot_display.to_string()
            } else {
                format_cents_whole(entry.base_cents)
            };
            let multiplied = multipliers
                .iter()
                .map(|m| (*m, apply_multiplier(entry.base_cents, *m, game).amount_cents))
                .collect();
            PaytableLine {
                tier: entry.tier,
                label: entry.tier.label(),
                description: entry.description,
                prize,
                base_cents: entry.base_cents,
                multiplied,
            }
        })
        .collect();

    PaytableListing {
        game,
        bonus_name: rules.bonus_name,
        multiplier_name: rules.multiplier_name,
        multipliers,
        lines,
    }
}
