use std::env;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; Lottery-API/1.0)";
const DEFAULT_MEGAMILLIONS_API_BASE: &str = "https://www.megamillions.com/cmspages/utilservice.asmx";
const DEFAULT_POWERBALL_BASE_URL: &str = "https://www.powerball.com";
const DEFAULT_JACKPOT_DISPLAY: &str = "Jackpot (varies)";

#[derive(Debug, Clone)]
pub struct LottoConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub megamillions_api_base: String,
    pub powerball_base_url: String,
    pub default_jackpot: String,
}

impl Default for LottoConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            megamillions_api_base: DEFAULT_MEGAMILLIONS_API_BASE.to_string(),
            powerball_base_url: DEFAULT_POWERBALL_BASE_URL.to_string(),
            default_jackpot: DEFAULT_JACKPOT_DISPLAY.to_string(),
        }
    }
}

impl LottoConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let timeout_secs = env::var("LOTTO_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);

        Self {
            timeout_secs,
            user_agent: env_string("LOTTO_USER_AGENT").unwrap_or(defaults.user_agent),
            megamillions_api_base: env_string("MEGAMILLIONS_API_BASE")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.megamillions_api_base),
            powerball_base_url: env_string("POWERBALL_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.powerball_base_url),
            default_jackpot: env_string("LOTTO_DEFAULT_JACKPOT").unwrap_or(defaults.default_jackpot),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
