//! # Assistant Configuration
//!
//! Provider selection, per-agent overrides and the loop/flow limits.
//! Persisted as JSON under `.prodpilot/config.json`; secrets never live here,
//! they come from the environment.

use crate::errors::Result;
use crate::models::{LlmProvider, ModelConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default location of the persisted config, relative to the working directory
pub const CONFIG_PATH: &str = ".prodpilot/config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Global LLM provider (default: Anthropic)
    pub global_provider: LlmProvider,
    /// Global model to use for all agents
    pub global_model: Option<String>,
    /// Base URL override for LLM API (for OpenAI-compatible endpoints)
    pub base_url: Option<String>,
    /// Per-agent model overrides (agent name -> model name)
    pub per_agent_models: HashMap<String, String>,
    /// Per-agent provider overrides (agent name -> provider)
    pub per_agent_providers: HashMap<String, LlmProvider>,
    /// Per-agent base URL overrides (agent name -> base_url, for OpenAI)
    pub per_agent_base_urls: HashMap<String, String>,
    /// Refinement cycles allowed after the first draft
    pub max_refinement_cycles: u32,
    /// Agent invocations allowed per feature-definition turn
    pub max_feature_turns: u32,
    /// Internal turns granted to conversational agents that use tools
    pub max_agent_turns: u32,
    /// Upper bound on planned searches per research run
    pub max_searches: usize,
    /// Replace the fixed feasibility/impact assessments with live agent calls
    pub live_synthesis: bool,
    /// Custom SearXNG instance URL (overrides auto-discovery)
    pub searxng_url: Option<String>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            global_provider: LlmProvider::Anthropic,
            global_model: None,
            base_url: None,
            per_agent_models: HashMap::new(),
            per_agent_providers: HashMap::new(),
            per_agent_base_urls: HashMap::new(),
            max_refinement_cycles: 2,
            max_feature_turns: 6,
            max_agent_turns: 10,
            max_searches: 5,
            live_synthesis: false,
            searxng_url: None,
        }
    }
}

impl AssistantConfig {
    /// Get model config for a specific agent
    pub fn model_for(&self, agent: &str) -> ModelConfig {
        // Provider: per-agent override -> global
        let provider = self
            .per_agent_providers
            .get(agent)
            .copied()
            .unwrap_or(self.global_provider);

        // Model: per-agent override -> global -> default for provider
        let model = self
            .per_agent_models
            .get(agent)
            .or(self.global_model.as_ref())
            .cloned()
            .unwrap_or_else(|| provider.default_model().to_string());

        // Base URL only makes sense for OpenAI-compatible endpoints
        let base_url = if provider.supports_base_url() {
            self.per_agent_base_urls
                .get(agent)
                .or(self.base_url.as_ref())
                .cloned()
        } else {
            None
        };

        ModelConfig {
            provider,
            model,
            base_url,
        }
    }

    /// Load from `path`, falling back to defaults when the file is missing or unreadable
    pub async fn load(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config at {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Apply a partial update; absent fields keep their current value
    pub fn merge(&mut self, patch: ConfigPatch) {
        if let Some(provider) = patch.global_provider {
            self.global_provider = provider;
        }
        if patch.global_model.is_some() {
            self.global_model = patch.global_model;
        }
        if patch.base_url.is_some() {
            self.base_url = patch.base_url;
        }
        if let Some(models) = patch.per_agent_models {
            self.per_agent_models.extend(models);
        }
        if let Some(providers) = patch.per_agent_providers {
            self.per_agent_providers.extend(providers);
        }
        if let Some(urls) = patch.per_agent_base_urls {
            self.per_agent_base_urls.extend(urls);
        }
        if let Some(cycles) = patch.max_refinement_cycles {
            self.max_refinement_cycles = cycles;
        }
        if let Some(turns) = patch.max_feature_turns {
            self.max_feature_turns = turns;
        }
        if let Some(turns) = patch.max_agent_turns {
            self.max_agent_turns = turns.max(1);
        }
        if let Some(searches) = patch.max_searches {
            self.max_searches = searches.max(1);
        }
        if let Some(live) = patch.live_synthesis {
            self.live_synthesis = live;
        }
        if patch.searxng_url.is_some() {
            self.searxng_url = patch.searxng_url;
        }
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from(CONFIG_PATH)
    }
}

/// Partial configuration accepted by `PATCH /api/v1/config`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_provider: Option<LlmProvider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_agent_models: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_agent_providers: Option<HashMap<String, LlmProvider>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_agent_base_urls: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_refinement_cycles: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_feature_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_agent_turns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_searches: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_synthesis: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub searxng_url: Option<String>,
}
