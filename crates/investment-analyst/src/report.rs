//! Report request builder: prompt, one agent call, downloadable result

use crate::analysis::AnalysisType;
use crate::config::AgentSettings;
use crate::error::{AnalystError, Result};
use crate::instructions::analyst_profile;
use crate::provider::Provider;
use crate::session::{ApiKey, SessionConfig};
use analyst_agent::{AgentBuilder, AgentProfile, ExecutorConfig, RunOutput, ToolRegistry};
use analyst_llm::{OpenAiLikeConfig, OpenAiLikeProvider};
use analyst_market::{QuoteSource, market_data_tools};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// MIME type of the downloadable report
pub const REPORT_MIME: &str = "text/markdown";

/// Prompt for one run, built deterministically from a session config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    analysis_type: AnalysisType,
    prompt: String,
}

impl AnalysisRequest {
    pub fn from_config(config: &SessionConfig) -> Self {
        let analysis_type = config.analysis_type();
        Self {
            analysis_type,
            prompt: analysis_type.prompt(config.ticker_a(), config.ticker_b()),
        }
    }

    pub fn analysis_type(&self) -> AnalysisType {
        self.analysis_type
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

/// How to build the agent for one run
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub provider: Provider,
    pub endpoint: &'static str,
    pub model_id: &'static str,
    pub api_key: ApiKey,
    pub profile: AgentProfile,
}

impl AgentSpec {
    pub fn from_config(config: &SessionConfig) -> Self {
        let provider = config.provider();
        Self {
            provider,
            endpoint: provider.base_url(),
            model_id: config.model().id,
            api_key: config.api_key().clone(),
            profile: analyst_profile(),
        }
    }
}

/// The single seam to the agent runtime
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// Build an agent from `spec` and run it once on `prompt`
    async fn run(&self, spec: &AgentSpec, prompt: &str) -> analyst_agent::Result<RunOutput>;
}

/// Backend that calls the provider's OpenAI-compatible endpoint with the
/// market-data tools attached
pub struct LiveAgentBackend {
    settings: AgentSettings,
    quotes: Arc<dyn QuoteSource>,
}

impl LiveAgentBackend {
    pub fn new(settings: AgentSettings, quotes: Arc<dyn QuoteSource>) -> Self {
        Self { settings, quotes }
    }
}

#[async_trait]
impl AgentBackend for LiveAgentBackend {
    async fn run(&self, spec: &AgentSpec, prompt: &str) -> analyst_agent::Result<RunOutput> {
        let llm = OpenAiLikeProvider::new(
            OpenAiLikeConfig::new(spec.provider.slug(), spec.endpoint, spec.api_key.expose())
                .with_timeout(self.settings.timeout),
        )?;
        let tools = ToolRegistry::from_tools(market_data_tools(self.quotes.clone()))?;
        let config = ExecutorConfig::new(spec.model_id)
            .with_max_iterations(self.settings.max_iterations)
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);

        let agent = AgentBuilder::new(Arc::new(llm))
            .name("investment-analyst")
            .profile(spec.profile.clone())
            .tools(tools)
            .config(config)
            .build()?;

        agent.run(prompt).await
    }
}

/// The agent's markdown answer for a ticker pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport {
    ticker_a: String,
    ticker_b: String,
    content: String,
}

impl AnalysisReport {
    pub fn new(ticker_a: impl Into<String>, ticker_b: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            ticker_a: ticker_a.into(),
            ticker_b: ticker_b.into(),
            content: content.into(),
        }
    }

    pub fn ticker_a(&self) -> &str {
        &self.ticker_a
    }

    pub fn ticker_b(&self) -> &str {
        &self.ticker_b
    }

    /// The model's text, unmodified
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn file_name(&self) -> String {
        report_file_name(&self.ticker_a, &self.ticker_b)
    }

    pub fn mime(&self) -> &'static str {
        REPORT_MIME
    }
}

/// `{A}_vs_{B}_analysis.md`, with characters that are unsafe in a quoted
/// `Content-Disposition` filename replaced by `_`
pub fn report_file_name(ticker_a: &str, ticker_b: &str) -> String {
    let clean = |ticker: &str| -> String {
        ticker
            .trim()
            .to_uppercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    };
    format!("{}_vs_{}_analysis.md", clean(ticker_a), clean(ticker_b))
}

/// Builds the prompt for a session and runs the agent exactly once
pub struct ReportRequestBuilder {
    backend: Arc<dyn AgentBackend>,
}

impl ReportRequestBuilder {
    pub fn new(backend: Arc<dyn AgentBackend>) -> Self {
        Self { backend }
    }

    pub fn build_request(&self, config: &SessionConfig) -> AnalysisRequest {
        AnalysisRequest::from_config(config)
    }

    /// Build the prompt for `config`, run the agent once and wrap its answer.
    /// Any failure while building or running the agent is reported as
    /// [`AnalystError::ExternalCallFailure`]; nothing is retried.
    pub async fn build_and_run(&self, config: &SessionConfig) -> Result<AnalysisReport> {
        let request = self.build_request(config);
        let spec = AgentSpec::from_config(config);

        info!(
            provider = %spec.provider,
            model = spec.model_id,
            ticker_a = config.ticker_a(),
            ticker_b = config.ticker_b(),
            analysis_type = %request.analysis_type(),
            "Starting analysis"
        );
        let started = Instant::now();

        match self.backend.run(&spec, request.prompt()).await {
            Ok(output) => {
                info!(
                    duration_ms = started.elapsed().as_millis() as u64,
                    iterations = output.iterations,
                    tool_calls = output.tool_calls,
                    input_tokens = output.usage.input_tokens,
                    output_tokens = output.usage.output_tokens,
                    report_length = output.content.len(),
                    "Analysis completed"
                );
                Ok(AnalysisReport::new(config.ticker_a(), config.ticker_b(), output.content))
            }
            Err(err) => {
                error!(
                    duration_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "Analysis failed"
                );
                Err(AnalystError::ExternalCallFailure(err.to_string()))
            }
        }
    }
}
