//! Error types for market-data lookups

use analyst_agent::ToolError;
use thiserror::Error;

/// Market-data errors
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Invalid range '{0}' (expected one of 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, ytd)")]
    InvalidRange(String),

    /// The source answered but had nothing usable for the symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("Yahoo Finance error: {0}")]
    Yahoo(String),

    #[error("Technical indicator error: {0}")]
    Indicator(String),
}

/// Result type alias for market-data operations
pub type Result<T> = std::result::Result<T, MarketError>;

impl From<MarketError> for ToolError {
    fn from(err: MarketError) -> Self {
        match err {
            MarketError::InvalidSymbol(_) | MarketError::InvalidRange(_) => {
                ToolError::InvalidInput(err.to_string())
            }
            other => ToolError::Failed(other.to_string()),
        }
    }
}
