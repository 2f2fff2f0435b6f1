//! Agent executor for running tool-calling loops
//!
//! The loop:
//! 1. Send the conversation and the tool definitions to the model
//! 2. If the model asks for tools, run them and append the results
//! 3. Otherwise return the model's text
//!
//! Tool failures never abort the run; they are handed back to the model as
//! the tool result so it can explain or work around them.

use crate::{AgentError, Result, ToolRegistry};
use analyst_llm::{ChatProvider, CompletionRequest, Message, StopReason, TokenUsage, ToolCall};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Configuration for one agent run
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Provider-specific model id
    pub model: String,

    /// Maximum number of model calls per run (prevents endless tool loops)
    pub max_iterations: usize,

    /// Max tokens per completion; `None` uses the provider default
    pub max_tokens: Option<u32>,

    /// Sampling temperature; `None` uses the provider default
    pub temperature: Option<f32>,
}

impl ExecutorConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            max_iterations: 10,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Final answer of a run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// The model's final text, unmodified
    pub content: String,
    pub model: String,
    /// Number of model calls made
    pub iterations: usize,
    /// Number of tool calls executed
    pub tool_calls: usize,
    pub usage: TokenUsage,
}

/// Drives the model ⇄ tool loop
pub struct AgentExecutor {
    provider: Arc<dyn ChatProvider>,
    tools: Arc<ToolRegistry>,
    config: ExecutorConfig,
}

impl AgentExecutor {
    pub fn new(
        provider: Arc<dyn ChatProvider>,
        tools: Arc<ToolRegistry>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run the loop for a single user message
    pub async fn run(&self, system_prompt: Option<&str>, user_message: String) -> Result<RunOutput> {
        let mut conversation = Vec::with_capacity(2);
        if let Some(system) = system_prompt.filter(|s| !s.is_empty()) {
            conversation.push(Message::system(system));
        }
        conversation.push(Message::user(user_message));

        let definitions = self.tools.definitions();
        let mut usage = TokenUsage::default();
        let mut tool_calls = 0;

        for iteration in 1..=self.config.max_iterations {
            info!(
                iteration,
                max_iterations = self.config.max_iterations,
                provider = self.provider.name(),
                model = %self.config.model,
                tool_count = definitions.len(),
                "Sending request to LLM"
            );

            let request = CompletionRequest::builder(&self.config.model)
                .messages(conversation.clone())
                .tools(definitions.clone())
                .max_tokens(self.config.max_tokens)
                .temperature(self.config.temperature)
                .build();

            let response = self.provider.complete(request).await?;
            usage.add(response.usage);

            info!(
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "LLM response received"
            );

            match response.stop_reason {
                StopReason::ToolUse if response.message.has_tool_calls() => {
                    let results = self.execute_tools(response.message.tool_calls()).await;
                    tool_calls += results.len();
                    conversation.push(response.message);
                    conversation.extend(results);
                }
                StopReason::ContentFilter => {
                    warn!("Response blocked by content filter");
                    return Err(AgentError::ContentFiltered);
                }
                stop_reason => {
                    if stop_reason == StopReason::MaxTokens {
                        warn!("Hit max tokens in LLM response, returning truncated text");
                    }
                    let content = response
                        .message
                        .text()
                        .filter(|text| !text.trim().is_empty())
                        .ok_or(AgentError::EmptyResponse)?
                        .to_string();

                    info!(
                        iteration,
                        tool_calls,
                        response_length = content.len(),
                        "Agent completed"
                    );
                    return Ok(RunOutput {
                        content,
                        model: self.config.model.clone(),
                        iterations: iteration,
                        tool_calls,
                        usage,
                    });
                }
            }
        }

        warn!(
            max_iterations = self.config.max_iterations,
            "Max iterations reached, stopping"
        );
        Err(AgentError::IterationLimit(self.config.max_iterations))
    }

    /// Run each requested tool in order and turn the outcome into a tool message
    async fn execute_tools(&self, calls: &[ToolCall]) -> Vec<Message> {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            let name = call.function.name.as_str();
            let started = Instant::now();

            let outcome = match self.tools.get(name) {
                None => Err(format!("Unknown tool: {name}")),
                Some(tool) => match call.function.parse_arguments() {
                    Err(e) => Err(format!("Arguments are not valid JSON: {e}")),
                    Ok(params) => {
                        debug!(tool_name = name, params = %params, "Executing tool");
                        tool.execute(params).await.map_err(|e| e.to_string())
                    }
                },
            };

            let duration_ms = started.elapsed().as_millis() as u64;
            let content = match outcome {
                Ok(value) => {
                    info!(tool_name = name, tool_id = %call.id, duration_ms, "Tool execution succeeded");
                    value.to_string()
                }
                Err(error) => {
                    warn!(tool_name = name, tool_id = %call.id, duration_ms, error = %error, "Tool execution failed");
                    json!({ "error": error }).to_string()
                }
            };

            results.push(Message::tool_result(call.id.clone(), content));
        }

        results
    }
}
