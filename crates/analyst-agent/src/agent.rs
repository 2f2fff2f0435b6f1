//! A ready-to-run agent: provider, profile, tools and executor settings

use crate::{AgentError, AgentExecutor, AgentProfile, ExecutorConfig, Result, RunOutput, ToolRegistry};
use analyst_llm::ChatProvider;
use std::sync::Arc;
use tracing::info;

/// An assembled agent. Each [`Agent::run`] is an independent conversation.
pub struct Agent {
    name: String,
    system_prompt: String,
    executor: AgentExecutor,
}

impl Agent {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rendered system prompt sent with every run
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run one non-streaming conversation with `prompt` as the only user input
    pub async fn run(&self, prompt: impl Into<String>) -> Result<RunOutput> {
        info!(agent = %self.name, model = %self.executor.config().model, "Agent run started");
        self.executor
            .run(Some(&self.system_prompt), prompt.into())
            .await
    }
}

/// Builder for [`Agent`]
pub struct AgentBuilder {
    provider: Arc<dyn ChatProvider>,
    name: String,
    profile: AgentProfile,
    tools: ToolRegistry,
    config: Option<ExecutorConfig>,
}

impl AgentBuilder {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            provider,
            name: "agent".to_string(),
            profile: AgentProfile::default(),
            tools: ToolRegistry::new(),
            config: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn profile(mut self, profile: AgentProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn config(mut self, config: ExecutorConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<Agent> {
        let config = self
            .config
            .ok_or_else(|| AgentError::Initialization("executor config is required".to_string()))?;
        if config.model.trim().is_empty() {
            return Err(AgentError::Initialization("model id is empty".to_string()));
        }
        if config.max_iterations == 0 {
            return Err(AgentError::Initialization(
                "max_iterations must be at least 1".to_string(),
            ));
        }

        Ok(Agent {
            name: self.name,
            system_prompt: self.profile.system_prompt(),
            executor: AgentExecutor::new(self.provider, Arc::new(self.tools), config),
        })
    }
}
