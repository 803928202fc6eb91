use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Game {
    MegaMillions,
    Powerball,
}

impl Game {
    pub const ALL: [Game; 2] = [Game::MegaMillions, Game::Powerball];

    pub fn slug(self) -> &'static str {
        match self {
            Game::MegaMillions => "megamillions",
            Game::Powerball => "powerball",
        }
    }

    pub fn rules(self) -> &'static GameRules {
        match self {
            Game::MegaMillions => &MEGA_MILLIONS_RULES,
            Game::Powerball => &POWERBALL_RULES,
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Game {
    type Err = FetchError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key = raw
            .trim()
            .to_ascii_lowercase()
            .replace(['_', '-', ' '], "");
        match key.as_str() {
            "megamillions" => Ok(Game::MegaMillions),
            "powerball" => Ok(Game::Powerball),
            _ => Err(FetchError::UnsupportedGame(raw.trim().to_string())),
        }
    }
}

/// The nine winning tiers shared by both games, plus the catch-all for
/// the three losing combinations (2+0, 1+0, 0+0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Jackpot,
    Five,
    FourBonus,
    Four,
    ThreeBonus,
    Three,
    TwoBonus,
    OneBonus,
    BonusOnly,
    NoPrize,
}

impl Tier {
    /// Winning tiers in the order upstream prize tables list them.
    pub const CANONICAL: [Tier; 9] = [
        Tier::Jackpot,
        Tier::Five,
        Tier::FourBonus,
        Tier::Four,
        Tier::ThreeBonus,
        Tier::Three,
        Tier::TwoBonus,
        Tier::OneBonus,
        Tier::BonusOnly,
    ];

    pub fn from_matches(match_count: u8, bonus_match: bool) -> Tier {
        match (match_count, bonus_match) {
            (5, true) => Tier::Jackpot,
            (5, false) => Tier::Five,
            (4, true) => Tier::FourBonus,
            (4, false) => Tier::Four,
            (3, true) => Tier::ThreeBonus,
            (3, false) => Tier::Three,
            (2, true) => Tier::TwoBonus,
            (1, true) => Tier::OneBonus,
            (0, true) => Tier::BonusOnly,
            _ => Tier::NoPrize,
        }
    }

    /// Short label in the "5+1" notation used by prize tables.
    pub fn label(self) -> &'static str {
        match self {
            Tier::Jackpot => "5+1 (Jackpot)",
            Tier::Five => "5+0",
            Tier::FourBonus => "4+1",
            Tier::Four => "4+0",
            Tier::ThreeBonus => "3+1",
            Tier::Three => "3+0",
            Tier::TwoBonus => "2+1",
            Tier::OneBonus => "1+1",
            Tier::BonusOnly => "0+1",
            Tier::NoPrize => "No Match",
        }
    }

    /// Maps the CSS class token the Powerball results table puts on each
    /// row's ball graphic (`m4-pb`, `m3`, ...) to a tier.
    pub fn from_class_token(token: &str) -> Option<Tier> {
        let token = token.trim();
        let (count, bonus) = match token.strip_suffix("-pb") {
            Some(head) => (head, true),
            None => (token, false),
        };
        let count = count.strip_prefix('m')?.parse::<u8>().ok()?;
        if count > 5 {
            return None;
        }
        Some(Tier::from_matches(count, bonus))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiplierRule {
    /// Every legal multiplier scales every tier.
    Uniform,
    /// The top multiplier is replaced by `fallback` once the base amount
    /// reaches `threshold_cents`.
    CappedTop { threshold_cents: u64, fallback: u8 },
}

#[derive(Debug, Clone, Copy)]
pub struct PaytableEntry {
    pub tier: Tier,
    pub description: &'static str,
    pub base_cents: u64,
}

#[derive(Debug)]
pub struct GameRules {
    pub game: Game,
    pub bonus_name: &'static str,
    pub multiplier_name: &'static str,
    pub primary_max: u8,
    pub bonus_max: u8,
    /// Legal requested multipliers; 0 means none purchased.
    pub multipliers: &'static [u8],
    pub multiplier_rule: MultiplierRule,
    pub paytable: &'static [PaytableEntry; 9],
}

impl GameRules {
    pub fn entry(&self, tier: Tier) -> Option<&PaytableEntry> {
        self.paytable.iter().find(|e| e.tier == tier)
    }

    pub fn base_cents(&self, tier: Tier) -> u64 {
        self.entry(tier).map(|e| e.base_cents).unwrap_or(0)
    }

    pub fn is_legal_multiplier(&self, multiplier: u8) -> bool {
        self.multipliers.contains(&multiplier)
    }

    pub fn top_multiplier(&self) -> u8 {
        self.multipliers.iter().copied().max().unwrap_or(0)
    }

    pub fn allowed_multipliers_text(&self) -> String {
        self.multipliers
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

const LEGAL_MULTIPLIERS: &[u8] = &[0, 2, 3, 4, 5, 10];

/// $1,000,000 in cents. Power Play 10x never applies at or above this.
pub const POWER_PLAY_CAP_THRESHOLD_CENTS: u64 = 100_000_000;

static POWERBALL_PAYTABLE: [PaytableEntry; 9] = [
    PaytableEntry {
        tier: Tier::Jackpot,
        description: "5 white balls + Powerball",
        base_cents: 0,
    },
    PaytableEntry {
        tier: Tier::Five,
        description: "5 white balls (no Powerball)",
        base_cents: 100_000_000,
    },
    PaytableEntry {
        tier: Tier::FourBonus,
        description: "4 white balls + Powerball",
        base_cents: 5_000_000,
    },
    PaytableEntry {
        tier: Tier::Four,
        description: "4 white balls (no Powerball)",
        base_cents: 10_000,
    },
    PaytableEntry {
        tier: Tier::ThreeBonus,
        description: "3 white balls + Powerball",
        base_cents: 10_000,
    },
    PaytableEntry {
        tier: Tier::Three,
        description: "3 white balls (no Powerball)",
        base_cents: 700,
    },
    PaytableEntry {
        tier: Tier::TwoBonus,
        description: "2 white balls + Powerball",
        base_cents: 700,
    },
    PaytableEntry {
        tier: Tier::OneBonus,
        description: "1 white ball + Powerball",
        base_cents: 400,
    },
    PaytableEntry {
        tier: Tier::BonusOnly,
        description: "Powerball only",
        base_cents: 400,
    },
];

static MEGA_MILLIONS_PAYTABLE: [PaytableEntry; 9] = [
    PaytableEntry {
        tier: Tier::Jackpot,
        description: "5 white balls + Mega Ball",
        base_cents: 0,
    },
    PaytableEntry {
        tier: Tier::Five,
        description: "5 white balls (no Mega Ball)",
        base_cents: 100_000_000,
    },
    PaytableEntry {
        tier: Tier::FourBonus,
        description: "4 white balls + Mega Ball",
        base_cents: 1_000_000,
    },
    PaytableEntry {
        tier: Tier::Four,
        description: "4 white balls (no Mega Ball)",
        base_cents: 50_000,
    },
    PaytableEntry {
        tier: Tier::ThreeBonus,
        description: "3 white balls + Mega Ball",
        base_cents: 20_000,
    },
    PaytableEntry {
        tier: Tier::Three,
        description: "3 white balls (no Mega Ball)",
        base_cents: 1_000,
    },
    PaytableEntry {
        tier: Tier::TwoBonus,
        description: "2 white balls + Mega Ball",
        base_cents: 1_000,
    },
    PaytableEntry {
        tier: Tier::OneBonus,
        description: "1 white ball + Mega Ball",
        base_cents: 400,
    },
    PaytableEntry {
        tier: Tier::BonusOnly,
        description: "Mega Ball only",
        base_cents: 200,
    },
];

static POWERBALL_RULES: GameRules = GameRules {
    game: Game::Powerball,
    bonus_name: "Powerball",
    multiplier_name: "Power Play",
    primary_max: 69,
    bonus_max: 26,
    multipliers: LEGAL_MULTIPLIERS,
    multiplier_rule: MultiplierRule::CappedTop {
        threshold_cents: POWER_PLAY_CAP_THRESHOLD_CENTS,
        fallback: 2,
    },
    paytable: &POWERBALL_PAYTABLE,
};

static MEGA_MILLIONS_RULES: GameRules = GameRules {
    game: Game::MegaMillions,
    bonus_name: "Mega Ball",
    multiplier_name: "Megaplier",
    primary_max: 70,
    bonus_max: 25,
    multipliers: LEGAL_MULTIPLIERS,
    multiplier_rule: MultiplierRule::Uniform,
    paytable: &MEGA_MILLIONS_PAYTABLE,
};
