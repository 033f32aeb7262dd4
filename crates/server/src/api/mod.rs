//! HTTP surface: chat turns, streamed research and config.

pub mod chat;
pub mod config;
pub mod research;

use crate::state::SharedState;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Serialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

/// Handler error rendered as `ApiResponse { success: false }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// An agent or upstream model failed
    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!("Request failed ({}): {}", self.status, self.message);
        (
            self.status,
            Json(ApiResponse {
                success: false,
                message: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "ProdPilot API",
        version = "1.0.0",
        description = "Conversational product-management assistant: research a product idea, then shape it into a feature definition."
    ),
    paths(
        chat::send_message,
        chat::get_session,
        chat::delete_session,
        chat::reset_session,
        research::stream_research,
        research::clarify_questions,
        research::clarified_query,
        config::get_config,
        config::update_config,
        config::get_providers,
    ),
    components(schemas(
        ApiResponse,
        chat::ChatRequest,
        chat::ChatResponse,
        chat::SessionView,
        chat::MessageView,
        research::ClarifyRequest,
        research::QuestionView,
        research::QuestionsResponse,
        research::ClarifiedRequest,
        research::ClarifiedResponse,
        config::ConfigResponse,
        config::ConfigUpdate,
        config::ProviderInfo,
        config::ProvidersResponse,
    )),
    tags(
        (name = "chat", description = "Conversation turns and session state"),
        (name = "research", description = "Market research stream and query clarification"),
        (name = "config", description = "Model providers and flow limits"),
    )
)]
pub struct ApiDoc;

async fn serve_openapi() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        ApiDoc::openapi().to_json().unwrap_or_default(),
    )
}

/// Full router with state applied
pub fn app(state: SharedState) -> Router {
    let api = Router::new()
        .route("/openapi.json", get(serve_openapi))
        .merge(chat::chat_routes())
        .merge(research::research_routes())
        .merge(config::config_routes());

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
}

#[cfg(test)]
mod tests;
