//! Command-line configuration for the server
//!
//! Only server and agent tuning lives here. Provider, model and API key are
//! chosen per session on the form and are never read from flags,
//! environment variables or files.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "investment-analyst",
    version,
    about = "Serve the AI investment analyst form"
)]
pub struct Cli {
    /// Address to serve the form on
    #[arg(long, default_value = "127.0.0.1:8501")]
    pub bind: SocketAddr,

    /// Upper bound on model round trips per analysis
    #[arg(long, default_value_t = 10)]
    pub max_iterations: usize,

    /// Completion token cap per model call (provider default when unset)
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (provider default when unset)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Timeout for each model call, in seconds (no timeout when unset)
    #[arg(long)]
    pub llm_timeout_secs: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Cli {
    pub fn agent_settings(&self) -> AgentSettings {
        AgentSettings {
            max_iterations: self.max_iterations,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.llm_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Tuning applied to every agent the server builds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSettings {
    pub max_iterations: usize,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout: Option<Duration>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            max_tokens: None,
            temperature: None,
            timeout: None,
        }
    }
}
