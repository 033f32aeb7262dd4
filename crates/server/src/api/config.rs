//! # Config API
//!
//! Read and patch the persisted assistant config. A patch rebuilds the
//! assistant, so the next turn uses the new providers and limits.

use crate::state::SharedState;
use axum::{extract::State, routing::get, Json, Router};
use prodpilot_core::config::{AssistantConfig, ConfigPatch};
use prodpilot_core::models::LlmProvider;
use prodpilot_core::skills::agent_definitions::ALL_AGENTS;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfigResponse {
    #[schema(value_type = Object)]
    pub config: AssistantConfig,
    /// Agent names accepted in per-agent overrides
    pub agents: Vec<String>,
}

impl ConfigResponse {
    fn new(config: AssistantConfig) -> Self {
        Self {
            config,
            agents: ALL_AGENTS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Fields to change; omitted fields keep their value
#[derive(Debug, Deserialize, ToSchema)]
#[schema(value_type = Object)]
pub struct ConfigUpdate(pub ConfigPatch);

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub default_model: String,
    pub supports_base_url: bool,
    pub env_var: String,
    /// Credentials found in the environment
    pub configured: bool,
}

impl From<LlmProvider> for ProviderInfo {
    fn from(provider: LlmProvider) -> Self {
        Self {
            id: provider.id().to_string(),
            name: provider.display_name().to_string(),
            default_model: provider.default_model().to_string(),
            supports_base_url: provider.supports_base_url(),
            env_var: provider.env_var().to_string(),
            configured: provider.has_credentials(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderInfo>,
}

pub fn config_routes() -> Router<SharedState> {
    Router::new()
        .route("/config", get(get_config).patch(update_config))
        .route("/providers", get(get_providers))
}

#[utoipa::path(
    get,
    path = "/api/v1/config",
    tag = "config",
    responses((status = 200, description = "Current configuration", body = ConfigResponse))
)]
pub async fn get_config(State(state): State<SharedState>) -> Json<ConfigResponse> {
    Json(ConfigResponse::new(state.config().await))
}

#[utoipa::path(
    patch,
    path = "/api/v1/config",
    tag = "config",
    request_body = ConfigUpdate,
    responses((status = 200, description = "Updated configuration", body = ConfigResponse))
)]
pub async fn update_config(
    State(state): State<SharedState>,
    Json(ConfigUpdate(patch)): Json<ConfigUpdate>,
) -> Json<ConfigResponse> {
    tracing::info!("Updating config: {:?}", patch);
    Json(ConfigResponse::new(state.update_config(patch).await))
}

#[utoipa::path(
    get,
    path = "/api/v1/providers",
    tag = "config",
    responses((status = 200, description = "Supported LLM providers", body = ProvidersResponse))
)]
pub async fn get_providers() -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: LlmProvider::all().into_iter().map(ProviderInfo::from).collect(),
    })
}
