//! # Chat API
//!
//! One POST per user turn. Sessions live in the server's `SessionStore`;
//! a turn clones the session, runs, and writes the result back.

use super::{ApiError, ApiResponse};
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use prodpilot_core::state::{Message, Session};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Omit to start a new session
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub session_id: String,
    /// Rendered markdown reply
    pub reply: String,
    /// `research` or `feature_definition`
    pub phase: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageView {
    pub role: String,
    pub content: String,
    pub at: String,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
            at: message.at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionView {
    pub session_id: String,
    pub phase: String,
    pub feature_turns: u32,
    pub messages: Vec<MessageView>,
}

impl SessionView {
    fn new(session_id: &str, session: &Session) -> Self {
        Self {
            session_id: session_id.to_string(),
            phase: session.phase.as_str().to_string(),
            feature_turns: session.feature_turns,
            messages: session
                .transcript
                .messages()
                .iter()
                .map(MessageView::from)
                .collect(),
        }
    }
}

pub fn chat_routes() -> Router<SharedState> {
    Router::new()
        .route("/chat", post(send_message))
        .route("/chat/:id", get(get_session).delete(delete_session))
        .route("/chat/:id/reset", post(reset_session))
}

/// Send one user message and get the assistant's reply
#[utoipa::path(
    post,
    path = "/api/v1/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Empty message", body = super::ApiResponse)
    )
)]
pub async fn send_message(
    State(state): State<SharedState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::bad_request("message must not be empty"));
    }

    let (session_id, slot) = state.sessions.get_or_create(req.session_id).await;
    let assistant = state.assistant().await;

    // Held for the whole turn: turns of one session never interleave
    let mut session = slot.lock().await;
    let turn = assistant.handle_turn(session.clone(), &req.message).await;
    *session = turn.session;

    tracing::info!(
        "Session {} turn complete (phase: {}, messages: {})",
        session_id,
        session.phase.as_str(),
        session.transcript.len()
    );

    Ok(Json(ChatResponse {
        session_id,
        reply: turn.reply,
        phase: session.phase.as_str().to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/chat/{id}",
    tag = "chat",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Transcript and phase", body = SessionView),
        (status = 404, description = "Unknown session", body = super::ApiResponse)
    )
)]
pub async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let slot = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Session {} not found", id)))?;
    let session = slot.lock().await;
    Ok(Json(SessionView::new(&id, &session)))
}

/// Clear transcript, phase and feature turns
#[utoipa::path(
    post,
    path = "/api/v1/chat/{id}/reset",
    tag = "chat",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session reset", body = SessionView),
        (status = 404, description = "Unknown session", body = super::ApiResponse)
    )
)]
pub async fn reset_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let slot = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("Session {} not found", id)))?;
    let mut session = slot.lock().await;
    session.reset();
    tracing::info!("Session {} reset", id);
    Ok(Json(SessionView::new(&id, &session)))
}

/// Drop the session and its transcript
#[utoipa::path(
    delete,
    path = "/api/v1/chat/{id}",
    tag = "chat",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session deleted", body = super::ApiResponse),
        (status = 404, description = "Unknown session", body = super::ApiResponse)
    )
)]
pub async fn delete_session(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    if !state.sessions.remove(&id).await {
        return Err(ApiError::not_found(format!("Session {} not found", id)));
    }
    tracing::info!("Session {} deleted", id);
    Ok(Json(ApiResponse {
        success: true,
        message: format!("Session {} deleted", id),
    }))
}
