//! AI investment analyst
//!
//! A single-page web form: pick an inference provider and model, enter an
//! API key and two tickers, choose an analysis type, and get a markdown
//! comparison report written by an LLM agent that can look up market data.
//!
//! - [`session`] turns form input into a [`SessionConfig`](session::SessionConfig)
//! - [`report`] turns a config into a prompt, runs the agent once and wraps
//!   the answer as a downloadable [`AnalysisReport`](report::AnalysisReport)
//! - [`web`] serves the form

pub mod analysis;
pub mod config;
pub mod error;
pub mod instructions;
pub mod logging;
pub mod provider;
pub mod report;
pub mod session;
pub mod web;

pub use analysis::AnalysisType;
pub use error::AnalystError;
pub use provider::{ModelOption, Provider, ProviderProfile};
pub use report::{AgentBackend, AnalysisReport, AnalysisRequest, LiveAgentBackend, ReportRequestBuilder};
pub use session::{ApiKey, Panel, PanelInput, Readiness, SessionConfig};
