//! Error types for agent runs and tool execution

use analyst_llm::LlmError;
use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Result type returned by [`Tool::execute`](crate::Tool::execute)
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Failures that abort an agent run
#[derive(Error, Debug)]
pub enum AgentError {
    /// The agent could not be assembled (missing model, duplicate tool, ...)
    #[error("Agent initialization failed: {0}")]
    Initialization(String),

    #[error(transparent)]
    Llm(#[from] LlmError),

    /// The model kept requesting tools past the configured limit
    #[error("Agent did not finish within {0} iterations")]
    IterationLimit(usize),

    #[error("Model returned an empty response")]
    EmptyResponse,

    #[error("Response was blocked by the provider's content filter")]
    ContentFiltered,
}

/// Failures inside a tool. These are reported back to the model as the
/// tool result instead of aborting the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Failed(String),
}
