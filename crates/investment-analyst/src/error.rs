//! Error types for report generation

use thiserror::Error;

/// Result type alias for report generation
pub type Result<T> = std::result::Result<T, AnalystError>;

/// Shown under every failure message
pub const RETRY_SUGGESTION: &str = "Please check that the stock symbols are valid and try again.";

/// Failure of an analysis run
///
/// Building the agent and running it are one step from the user's point of
/// view (bad key, network, invalid ticker, rate limit, malformed reply), so
/// they share a single variant carrying the underlying message.
#[derive(Debug, Error)]
pub enum AnalystError {
    #[error("Error during analysis: {0}")]
    ExternalCallFailure(String),
}

impl AnalystError {
    pub fn suggestion(&self) -> &'static str {
        RETRY_SUGGESTION
    }
}
