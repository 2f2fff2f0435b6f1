//! Chat provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Anything that can answer a chat completion request
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send one non-streaming completion request
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Short provider name used in logs (e.g. "cerebras")
    fn name(&self) -> &str;
}
