//! Chat completion client for OpenAI-compatible inference endpoints
//!
//! Both Cerebras and Groq expose the OpenAI `chat/completions` wire format,
//! so a single client type covers them. This crate provides:
//!
//! - Message types mirroring the chat wire format (including tool calls)
//! - Completion request/response types
//! - Tool definitions for function calling
//! - The [`ChatProvider`] trait and the [`OpenAiLikeProvider`] implementation

pub mod completion;
pub mod error;
pub mod messages;
pub mod openai_like;
pub mod provider;
pub mod tools;

pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LlmError, Result};
pub use messages::{FunctionCall, Message, ToolCall};
pub use openai_like::{OpenAiLikeConfig, OpenAiLikeProvider};
pub use provider::ChatProvider;
pub use tools::{ToolDefinition, schema};
