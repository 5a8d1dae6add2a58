//! Ticker input normalisation and format checks

use thiserror::Error;

/// Longest ticker accepted; most are 1-5 characters, a few run longer
pub const MAX_TICKER_LEN: usize = 10;

/// Why a ticker was rejected before any network call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TickerError {
    #[error("Ticker cannot be empty")]
    Empty,

    #[error("Ticker contains invalid characters")]
    InvalidCharacters,

    #[error("Ticker too long")]
    TooLong,
}

/// Trim and upper-case raw user input
pub fn normalize_ticker(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Check ticker format
///
/// Letters and digits only, with dots allowed for class shares such as
/// `BRK.B`. Existence is not checked here: an unknown ticker only shows up
/// as a fetch failure.
pub fn validate_ticker(ticker: &str) -> Result<(), TickerError> {
    if ticker.is_empty() {
        return Err(TickerError::Empty);
    }

    let without_dots: String = ticker.chars().filter(|c| *c != '.').collect();
    if without_dots.is_empty() || !without_dots.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(TickerError::InvalidCharacters);
    }

    if ticker.chars().count() > MAX_TICKER_LEN {
        return Err(TickerError::TooLong);
    }

    Ok(())
}
