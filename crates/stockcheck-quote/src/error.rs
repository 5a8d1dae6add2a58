//! Error types for quote operations

use crate::validate::TickerError;
use thiserror::Error;

/// Quote fetching specific errors
///
/// These never reach the dashboards' users: the fetch-or-fallback boundary
/// logs them and substitutes the fallback record.
#[derive(Debug, Error)]
pub enum StockError {
    /// Provider answered with an unusable response
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid stock symbol provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(#[from] TickerError),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Malformed URL in configuration or request building
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    /// Page markup did not match what the parser expects
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for quote operations
pub type Result<T> = std::result::Result<T, StockError>;
