//! Inference providers and their model tables

use serde::Serialize;
use std::fmt;

/// A selectable model: display label and provider-specific id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelOption {
    pub label: &'static str,
    pub id: &'static str,
}

/// Static configuration of one provider
#[derive(Debug, PartialEq, Eq)]
pub struct ProviderProfile {
    pub name: &'static str,
    /// OpenAI-compatible base URL
    pub base_url: &'static str,
    /// Label of the API key field
    pub key_label: &'static str,
    /// Where users create a key
    pub key_url: &'static str,
    /// Ordered; the first entry is the default selection
    pub models: &'static [ModelOption],
}

static CEREBRAS: ProviderProfile = ProviderProfile {
    name: "Cerebras",
    base_url: "https://api.cerebras.ai/v1",
    key_label: "Cerebras API Key",
    key_url: "https://cloud.cerebras.ai",
    models: &[
        ModelOption {
            label: "Llama 3.3 70B",
            id: "llama-3.3-70b",
        },
        ModelOption {
            label: "Llama 3.1 70B",
            id: "llama3.1-70b",
        },
        ModelOption {
            label: "Llama 3.1 8B",
            id: "llama3.1-8b",
        },
    ],
};

static GROQ: ProviderProfile = ProviderProfile {
    name: "Groq",
    base_url: "https://api.groq.com/openai/v1",
    key_label: "Groq API Key",
    key_url: "https://console.groq.com/keys",
    models: &[
        ModelOption {
            label: "Llama 3.3 70B Versatile",
            id: "llama-3.3-70b-versatile",
        },
        ModelOption {
            label: "Llama 3.1 70B",
            id: "llama3-70b-8192",
        },
        ModelOption {
            label: "Llama 3.1 8B",
            id: "llama3-8b-8192",
        },
        ModelOption {
            label: "Mixtral 8x7B",
            id: "mixtral-8x7b-32768",
        },
        ModelOption {
            label: "Gemma 7B",
            id: "gemma-7b-it",
        },
    ],
};

/// Supported inference providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Provider {
    #[default]
    Cerebras,
    Groq,
}

impl Provider {
    /// Display order of the provider selector
    pub const ALL: [Provider; 2] = [Provider::Cerebras, Provider::Groq];

    pub fn profile(self) -> &'static ProviderProfile {
        match self {
            Self::Cerebras => &CEREBRAS,
            Self::Groq => &GROQ,
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    /// Lowercase name for logs
    pub fn slug(self) -> &'static str {
        match self {
            Self::Cerebras => "cerebras",
            Self::Groq => "groq",
        }
    }

    /// Case-insensitive lookup by display name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn base_url(self) -> &'static str {
        self.profile().base_url
    }

    pub fn models(self) -> &'static [ModelOption] {
        self.profile().models
    }

    pub fn model_labels(self) -> impl Iterator<Item = &'static str> {
        self.models().iter().map(|m| m.label)
    }

    /// Model by label, searched only in this provider's table
    pub fn model(self, label: &str) -> Option<&'static ModelOption> {
        self.models().iter().find(|m| m.label == label)
    }

    pub fn default_model(self) -> &'static ModelOption {
        &self.models()[0]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
