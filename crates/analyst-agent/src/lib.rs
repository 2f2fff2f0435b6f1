//! Agent runtime: a system profile, a tool registry and the tool-calling
//! loop that drives a [`ChatProvider`](analyst_llm::ChatProvider).
//!
//! ```no_run
//! use analyst_agent::{AgentBuilder, AgentProfile, ExecutorConfig, ToolRegistry};
//! use analyst_llm::{OpenAiLikeConfig, OpenAiLikeProvider};
//! use std::sync::Arc;
//!
//! # async fn demo(key: String) -> analyst_agent::Result<()> {
//! let provider = OpenAiLikeProvider::new(OpenAiLikeConfig::new(
//!     "groq",
//!     "https://api.groq.com/openai/v1",
//!     key,
//! ))?;
//!
//! let agent = AgentBuilder::new(Arc::new(provider))
//!     .profile(AgentProfile::new("You are a concise assistant.").with_markdown(true))
//!     .tools(ToolRegistry::new())
//!     .config(ExecutorConfig::new("llama-3.3-70b-versatile"))
//!     .build()?;
//!
//! let output = agent.run("Say hello").await?;
//! println!("{}", output.content);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod error;
pub mod executor;
pub mod profile;
pub mod tool;

pub use agent::{Agent, AgentBuilder};
pub use error::{AgentError, Result, ToolError, ToolResult};
pub use executor::{AgentExecutor, ExecutorConfig, RunOutput};
pub use profile::AgentProfile;
pub use tool::{Tool, ToolRegistry};

/// JSON schema helpers for [`Tool::parameters`]
pub use analyst_llm::schema;
