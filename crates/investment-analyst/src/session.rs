//! Configuration panel: turns raw form input into a session configuration
//!
//! Nothing here talks to the network. The panel only decides which provider
//! and model are selected, whether a key is present, and whether both
//! tickers are filled in. Whether the key actually works is only learned
//! when the analysis runs.

use crate::analysis::AnalysisType;
use crate::provider::{ModelOption, Provider};
use serde::Deserialize;
use std::fmt;

/// Secret API key. Never logged: `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// `None` for an empty or whitespace-only key
    pub fn new(raw: &str) -> Option<Self> {
        let key = raw.trim();
        (!key.is_empty()).then(|| Self(key.to_string()))
    }

    /// The raw key, for the `Authorization` header only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Raw values of the configuration form, as submitted
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct PanelInput {
    pub provider: String,
    /// Provider the page was rendered with, to detect a provider switch
    pub previous_provider: String,
    pub model: String,
    pub api_key: String,
    pub ticker_a: String,
    pub ticker_b: String,
    pub analysis_type: String,
}

impl fmt::Debug for PanelInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelInput")
            .field("provider", &self.provider)
            .field("previous_provider", &self.previous_provider)
            .field("model", &self.model)
            .field("api_key_present", &!self.api_key.trim().is_empty())
            .field("ticker_a", &self.ticker_a)
            .field("ticker_b", &self.ticker_b)
            .field("analysis_type", &self.analysis_type)
            .finish()
    }
}

/// Everything one analysis run needs. Only obtainable from a [`Panel`]
/// with a key and both tickers present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    provider: Provider,
    model: &'static ModelOption,
    api_key: ApiKey,
    ticker_a: String,
    ticker_b: String,
    analysis_type: AnalysisType,
}

impl SessionConfig {
    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn model(&self) -> &'static ModelOption {
        self.model
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    pub fn ticker_a(&self) -> &str {
        &self.ticker_a
    }

    pub fn ticker_b(&self) -> &str {
        &self.ticker_b
    }

    pub fn analysis_type(&self) -> AnalysisType {
        self.analysis_type
    }
}

/// Where the form stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// No key entered; nothing else matters yet
    NeedsApiKey,
    /// Key present, no tickers yet
    Idle,
    /// Key present, exactly one ticker filled
    WaitingForTicker,
    /// All inputs present; the trigger can be offered
    Ready(SessionConfig),
}

/// Whether the key field is filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Configured,
    Missing,
}

/// Resolved state of the configuration form for one interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub provider: Provider,
    pub model: &'static ModelOption,
    pub api_key: Option<ApiKey>,
    pub ticker_a: String,
    pub ticker_b: String,
    pub analysis_type: AnalysisType,
    /// The provider differs from the one the page was rendered with
    pub provider_changed: bool,
}

/// Trim and uppercase a ticker as typed
pub fn normalize_ticker(raw: &str) -> String {
    raw.trim().to_uppercase()
}

impl Panel {
    /// Resolve the submitted form
    ///
    /// - An unknown provider selects the first one.
    /// - A model label not in the provider's table selects its first model.
    /// - Switching provider clears the key, since keys are per provider.
    pub fn from_input(input: &PanelInput) -> Self {
        let provider = Provider::from_name(&input.provider).unwrap_or_default();
        let provider_changed =
            Provider::from_name(&input.previous_provider).is_some_and(|previous| previous != provider);

        let model = provider
            .model(&input.model)
            .unwrap_or_else(|| provider.default_model());
        let api_key = if provider_changed {
            None
        } else {
            ApiKey::new(&input.api_key)
        };

        Self {
            provider,
            model,
            api_key,
            ticker_a: normalize_ticker(&input.ticker_a),
            ticker_b: normalize_ticker(&input.ticker_b),
            analysis_type: AnalysisType::parse_or_default(&input.analysis_type),
            provider_changed,
        }
    }

    pub fn key_status(&self) -> KeyStatus {
        if self.api_key.is_some() {
            KeyStatus::Configured
        } else {
            KeyStatus::Missing
        }
    }

    /// Status line shown under the key field
    pub fn key_status_message(&self) -> String {
        match self.key_status() {
            KeyStatus::Configured => format!("✅ {} API Key configured", self.provider),
            KeyStatus::Missing => "⚠️ Please enter your API key to continue".to_string(),
        }
    }

    pub fn readiness(&self) -> Readiness {
        let Some(api_key) = &self.api_key else {
            return Readiness::NeedsApiKey;
        };
        match (self.ticker_a.is_empty(), self.ticker_b.is_empty()) {
            (true, true) => Readiness::Idle,
            (true, false) | (false, true) => Readiness::WaitingForTicker,
            (false, false) => Readiness::Ready(SessionConfig {
                provider: self.provider,
                model: self.model,
                api_key: api_key.clone(),
                ticker_a: self.ticker_a.clone(),
                ticker_b: self.ticker_b.clone(),
                analysis_type: self.analysis_type,
            }),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn input(provider: &str, model: &str, key: &str, a: &str, b: &str, kind: &str) -> PanelInput {
        PanelInput {
            provider: provider.to_string(),
            previous_provider: provider.to_string(),
            model: model.to_string(),
            api_key: key.to_string(),
            ticker_a: a.to_string(),
            ticker_b: b.to_string(),
            analysis_type: kind.to_string(),
        }
    }

    pub(crate) fn ready_config(input: &PanelInput) -> SessionConfig {
        match Panel::from_input(input).readiness() {
            Readiness::Ready(config) => config,
            other => panic!("expected a ready panel, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_form_defaults() {
        let panel = Panel::from_input(&PanelInput::default());
        assert_eq!(panel.provider, Provider::Cerebras);
        assert_eq!(panel.model.id, "llama-3.3-70b");
        assert_eq!(panel.analysis_type, AnalysisType::ComprehensiveComparison);
        assert_eq!(panel.key_status(), KeyStatus::Missing);
        assert_eq!(panel.readiness(), Readiness::NeedsApiKey);
        assert!(!panel.provider_changed);
    }

    #[test]
    fn test_ready_config_uppercases_and_trims_tickers() {
        let config = ready_config(&input("Groq", "Mixtral 8x7B", "gsk", " aapl", "msft ", "Risk Analysis"));
        assert_eq!(config.provider(), Provider::Groq);
        assert_eq!(config.model().id, "mixtral-8x7b-32768");
        assert_eq!(config.ticker_a(), "AAPL");
        assert_eq!(config.ticker_b(), "MSFT");
        assert_eq!(config.analysis_type(), AnalysisType::RiskAnalysis);
        assert_eq!(config.api_key().expose(), "gsk");
    }

    #[test]
    fn test_empty_key_blocks_regardless_of_other_fields() {
        for key in ["", "   ", "\t"] {
            let panel = Panel::from_input(&input("Groq", "Gemma 7B", key, "AAPL", "MSFT", "Quick Overview"));
            assert_eq!(panel.readiness(), Readiness::NeedsApiKey);
            assert_eq!(panel.key_status_message(), "⚠️ Please enter your API key to continue");
        }
    }

    #[test]
    fn test_one_ticker_waits() {
        let panel = Panel::from_input(&input("Cerebras", "", "k", "AAPL", "", ""));
        assert_eq!(panel.readiness(), Readiness::WaitingForTicker);
        let panel = Panel::from_input(&input("Cerebras", "", "k", "  ", "msft", ""));
        assert_eq!(panel.readiness(), Readiness::WaitingForTicker);
        let panel = Panel::from_input(&input("Cerebras", "", "k", "", "", ""));
        assert_eq!(panel.readiness(), Readiness::Idle);
        assert_eq!(panel.key_status_message(), "✅ Cerebras API Key configured");
    }

    #[test]
    fn test_model_from_other_provider_is_discarded() {
        // "Mixtral 8x7B" only exists for Groq
        let panel = Panel::from_input(&input("Cerebras", "Mixtral 8x7B", "k", "A", "B", ""));
        assert_eq!(panel.model, Provider::Cerebras.default_model());
    }

    #[test]
    fn test_provider_switch_clears_key_and_keeps_shared_label() {
        let mut form = input("Groq", "Llama 3.1 70B", "csk-cerebras-key", "AAPL", "MSFT", "");
        form.previous_provider = "Cerebras".to_string();
        let panel = Panel::from_input(&form);

        assert!(panel.provider_changed);
        assert!(panel.api_key.is_none());
        assert_eq!(panel.readiness(), Readiness::NeedsApiKey);
        assert_eq!(panel.model.id, "llama3-70b-8192");
    }

    #[test]
    fn test_key_is_redacted() {
        let key = ApiKey::new("super-secret").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(<redacted>)");
        assert_eq!(key.to_string(), "<redacted>");

        let config = ready_config(&input("Groq", "", "super-secret", "A", "B", ""));
        assert!(!format!("{config:?}").contains("super-secret"));

        let form = input("Groq", "", "super-secret", "A", "B", "");
        assert!(!format!("{form:?}").contains("super-secret"));
    }
}
