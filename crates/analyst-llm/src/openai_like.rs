//! Provider for OpenAI-compatible `chat/completions` endpoints
//!
//! Cerebras (`https://api.cerebras.ai/v1`) and Groq
//! (`https://api.groq.com/openai/v1`) both speak this protocol, so one
//! client type covers them. Only the base URL, key and model id differ.
//!
//! ```no_run
//! use analyst_llm::{ChatProvider, CompletionRequest, Message};
//! use analyst_llm::{OpenAiLikeConfig, OpenAiLikeProvider};
//!
//! # async fn demo(key: String) -> analyst_llm::Result<()> {
//! let config = OpenAiLikeConfig::new("cerebras", "https://api.cerebras.ai/v1", key);
//! let provider = OpenAiLikeProvider::new(config)?;
//!
//! let request = CompletionRequest::builder("llama-3.3-70b")
//!     .add_message(Message::user("Hello!"))
//!     .build();
//! let response = provider.complete(request).await?;
//! println!("{}", response.message.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use crate::{
    ChatProvider, CompletionRequest, CompletionResponse, LlmError, Message, Result, StopReason,
    TokenUsage, ToolCall, ToolDefinition,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

/// Longest slice of an error body carried into an error message
const ERROR_BODY_LIMIT: usize = 500;

/// Connection settings for one OpenAI-compatible endpoint
#[derive(Clone)]
pub struct OpenAiLikeConfig {
    /// Name used in logs
    pub provider_name: String,

    /// Base URL, without the `/chat/completions` suffix
    pub api_base: String,

    /// Bearer token. Never logged; `Debug` redacts it.
    pub api_key: String,

    /// Whole-request timeout. `None` leaves the call unbounded.
    pub timeout: Option<Duration>,
}

impl OpenAiLikeConfig {
    pub fn new(
        provider_name: impl Into<String>,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            provider_name: provider_name.into(),
            api_base: api_base.into(),
            api_key: api_key.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the completions resource
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

impl fmt::Debug for OpenAiLikeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiLikeConfig")
            .field("provider_name", &self.provider_name)
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Chat provider talking to an OpenAI-compatible endpoint
#[derive(Debug)]
pub struct OpenAiLikeProvider {
    client: Client,
    config: OpenAiLikeConfig,
}

impl OpenAiLikeProvider {
    /// Build the provider. Fails on an empty key or an unparseable base URL;
    /// the key itself is not checked until the first request.
    pub fn new(config: OpenAiLikeConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Configuration("API key is empty".to_string()));
        }
        Url::parse(&config.api_base).map_err(|e| {
            LlmError::Configuration(format!("invalid API base '{}': {e}", config.api_base))
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAiLikeConfig {
        &self.config
    }
}

#[async_trait]
impl ChatProvider for OpenAiLikeProvider {
    #[instrument(
        skip(self, request),
        fields(provider = %self.config.provider_name, model = %request.model, api_base = %self.config.api_base)
    )]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = WireRequest::from_request(&request);
        debug!(
            message_count = request.messages.len(),
            tool_count = request.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_text, &request.model));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::UnexpectedResponse(format!("Failed to parse response: {e}")))?;

        let parsed = parse_response(wire)?;
        debug!(
            stop_reason = ?parsed.stop_reason,
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "Received chat completion"
        );
        Ok(parsed)
    }

    fn name(&self) -> &str {
        &self.config.provider_name
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolDefinition,
}

impl<'a> WireRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            tools: request
                .tools
                .iter()
                .map(|function| WireTool {
                    kind: "function",
                    function,
                })
                .collect(),
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

// ============================================================================
// Conversion functions
// ============================================================================

fn status_error(status: StatusCode, body: &str, model: &str) -> LlmError {
    let body: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimitExceeded(body),
        400 | 422 => LlmError::InvalidRequest(body),
        404 => LlmError::ModelNotFound(model.to_string()),
        _ => LlmError::RequestFailed(format!("HTTP {status}: {body}")),
    }
}

fn parse_response(wire: WireResponse) -> Result<CompletionResponse> {
    let usage = wire.usage.map_or_else(TokenUsage::default, |u| TokenUsage {
        input_tokens: u.prompt_tokens,
        output_tokens: u.completion_tokens,
    });

    let choice = wire
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::UnexpectedResponse("No choices in response".to_string()))?;

    let tool_calls = choice.message.tool_calls.unwrap_or_default();
    let stop_reason = map_stop_reason(choice.finish_reason.as_deref(), !tool_calls.is_empty());
    let content = choice.message.content.filter(|text| !text.is_empty());

    Ok(CompletionResponse {
        message: Message::Assistant {
            content,
            tool_calls,
        },
        stop_reason,
        usage,
    })
}

fn map_stop_reason(reason: Option<&str>, has_tool_calls: bool) -> StopReason {
    match reason {
        Some("stop") if !has_tool_calls => StopReason::EndTurn,
        Some("length") => StopReason::MaxTokens,
        Some("content_filter") => StopReason::ContentFilter,
        Some("tool_calls" | "function_call") => StopReason::ToolUse,
        _ if has_tool_calls => StopReason::ToolUse,
        other => {
            if let Some(reason) = other.filter(|r| *r != "stop") {
                debug!(reason, "Unknown finish reason");
            }
            StopReason::EndTurn
        }
    }
}
