//! # ProdPilot Models
//!
//! LLM provider selection shared by the invoker and the server's config API.
//! Every provider reads its API key from the environment (`from_env()` in radkit),
//! so only the provider, model name and optional base URL live here.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// LLM backends an agent can be routed to. Serialized by [`LlmProvider::id`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    Gemini,
    OpenRouter,
    Grok,
    DeepSeek,
}

/// Static facts about a provider
#[derive(Debug, Clone, Copy)]
struct ProviderInfo {
    id: &'static str,
    name: &'static str,
    env_var: &'static str,
    default_model: &'static str,
}

impl LlmProvider {
    pub fn all() -> Vec<LlmProvider> {
        vec![
            LlmProvider::Anthropic,
            LlmProvider::OpenAI,
            LlmProvider::Gemini,
            LlmProvider::OpenRouter,
            LlmProvider::Grok,
            LlmProvider::DeepSeek,
        ]
    }

    fn info(&self) -> ProviderInfo {
        let (id, name, env_var, default_model) = match self {
            LlmProvider::Anthropic => ("anthropic", "Anthropic", "ANTHROPIC_API_KEY", "claude-sonnet-4-20250514"),
            LlmProvider::OpenAI => ("openai", "OpenAI", "OPENAI_API_KEY", "gpt-4o"),
            LlmProvider::Gemini => ("gemini", "Gemini", "GEMINI_API_KEY", "gemini-2.0-flash-exp"),
            LlmProvider::OpenRouter => ("openrouter", "OpenRouter", "OPENROUTER_API_KEY", "anthropic/claude-3.5-sonnet"),
            LlmProvider::Grok => ("grok", "Grok", "XAI_API_KEY", "grok-2"),
            LlmProvider::DeepSeek => ("deepseek", "DeepSeek", "DEEPSEEK_API_KEY", "deepseek-chat"),
        };
        ProviderInfo { id, name, env_var, default_model }
    }

    /// Stable identifier used in config files and the HTTP API
    pub fn id(&self) -> &'static str {
        self.info().id
    }

    pub fn display_name(&self) -> &'static str {
        self.info().name
    }

    /// Environment variable holding the credential
    pub fn env_var(&self) -> &'static str {
        self.info().env_var
    }

    /// Model used when neither the global nor a per-agent model is set
    pub fn default_model(&self) -> &'static str {
        self.info().default_model
    }

    /// Only the OpenAI client takes a custom endpoint
    pub fn supports_base_url(&self) -> bool {
        matches!(self, LlmProvider::OpenAI)
    }

    /// True when the provider's credential is present in the environment
    pub fn has_credentials(&self) -> bool {
        std::env::var(self.env_var())
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LlmProvider::all()
            .into_iter()
            .find(|p| p.id() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown LLM provider '{}'", s))
    }
}

/// Provider, model and endpoint for one agent.
///
/// Resolved per agent by [`crate::config::AssistantConfig::model_for`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    pub model: String,
    /// OpenAI-compatible endpoint override
    pub base_url: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::with_provider(LlmProvider::Anthropic, LlmProvider::Anthropic.default_model())
    }
}

impl ModelConfig {
    /// `model` on the default provider
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_provider(LlmProvider::Anthropic, model)
    }

    pub fn with_provider(provider: LlmProvider, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}
