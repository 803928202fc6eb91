use serde::Serialize;
use thiserror::Error;

/// Coarse classification callers use to tell "fix your input" apart from
/// "try again later" and "this date has no drawing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Input,
    UpstreamUnavailable,
    UpstreamDataMissing,
    UpstreamMalformed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Invalid date format '{0}'. Please use MM/DD/YYYY format.")]
    InvalidDate(String),
    #[error("Unsupported lottery type '{0}'. Currently only 'megamillions' and 'powerball' are supported.")]
    UnsupportedGame(String),
    #[error("upstream unreachable: {0}")]
    Unreachable(String),
    #[error("upstream returned http {status}: {snippet}")]
    HttpStatus { status: u16, snippet: String },
    #[error("no drawing data: {0}")]
    NoData(String),
    #[error("malformed upstream payload: {0}")]
    Malformed(String),
}

impl FetchError {
    pub fn class(&self) -> ErrorClass {
        match self {
            FetchError::InvalidDate(_) | FetchError::UnsupportedGame(_) => ErrorClass::Input,
            FetchError::Unreachable(_) | FetchError::HttpStatus { .. } => {
                ErrorClass::UpstreamUnavailable
            }
            FetchError::NoData(_) => ErrorClass::UpstreamDataMissing,
            FetchError::Malformed(_) => ErrorClass::UpstreamMalformed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("expected exactly 5 primary numbers, got {0}")]
    WrongCount(usize),
    #[error("primary number {value} is outside 1..={max}")]
    PrimaryOutOfRange { value: u8, max: u8 },
    #[error("primary number {0} appears more than once")]
    Duplicate(u8),
    #[error("bonus number {value} is outside 1..={max}")]
    BonusOutOfRange { value: u8, max: u8 },
    #[error("multiplier must be one of {allowed}, got {value}")]
    IllegalMultiplier { value: u8, allowed: String },
}

/// Failure of the combined fetch-then-evaluate flow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error(transparent)]
    Ticket(#[from] TicketError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl CheckError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CheckError::Ticket(_) => ErrorClass::Input,
            CheckError::Fetch(err) => err.class(),
        }
    }
}
