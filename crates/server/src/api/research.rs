//! # Research API
//!
//! Server-sent events for the research stream: one `progress` event per
//! stage, then a `report` event. A failure ends the stream with an `error` event.

use super::ApiError;
use crate::state::SharedState;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResearchParams {
    /// Product idea to research
    pub query: String,
    /// Clarified form of the query, if the user went through clarification
    pub clarified: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClarifyRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionView {
    pub question: String,
    pub reasoning: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionsResponse {
    pub questions: Vec<QuestionView>,
    pub reasoning: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClarifiedRequest {
    pub query: String,
    /// Answers in question order
    pub answers: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClarifiedResponse {
    pub original_query: String,
    pub clarified_query: String,
}

pub fn research_routes() -> Router<SharedState> {
    Router::new()
        .route("/research/stream", get(stream_research))
        .route("/research/clarify", post(clarify_questions))
        .route("/research/clarified", post(clarified_query))
}

/// Run the research pipeline and stream its events
#[utoipa::path(
    get,
    path = "/api/v1/research/stream",
    tag = "research",
    params(ResearchParams),
    responses(
        (status = 200, description = "SSE stream of progress, report and error events", content_type = "text/event-stream"),
        (status = 400, description = "Empty query", body = super::ApiResponse)
    )
)]
pub async fn stream_research(
    State(state): State<SharedState>,
    Query(params): Query<ResearchParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    if params.query.trim().is_empty() {
        return Err(ApiError::bad_request("query must not be empty"));
    }

    tracing::info!("Starting research stream for: {}", params.query);
    let assistant = state.assistant().await;
    let events = assistant
        .research()
        .run(&params.query, params.clarified.as_deref())
        .map(|item| {
            let event = match item {
                Ok(event) => Event::default()
                    .event(event.kind())
                    .data(serde_json::to_string(&event).unwrap_or_default()),
                Err(e) => {
                    tracing::warn!("Research stream failed: {}", e);
                    Event::default().event("error").data(e.to_string())
                }
            };
            Ok(event)
        });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Three clarifying questions about a research query
#[utoipa::path(
    post,
    path = "/api/v1/research/clarify",
    tag = "research",
    request_body = ClarifyRequest,
    responses(
        (status = 200, description = "Clarifying questions", body = QuestionsResponse),
        (status = 502, description = "Clarifier agent failed", body = super::ApiResponse)
    )
)]
pub async fn clarify_questions(
    State(state): State<SharedState>,
    Json(req): Json<ClarifyRequest>,
) -> Result<Json<QuestionsResponse>, ApiError> {
    if req.query.trim().is_empty() {
        return Err(ApiError::bad_request("query must not be empty"));
    }

    let assistant = state.assistant().await;
    let questions = assistant
        .clarifier()
        .questions(&req.query)
        .await
        .map_err(|e| ApiError::upstream(e.to_string()))?;

    Ok(Json(QuestionsResponse {
        questions: questions
            .questions
            .into_iter()
            .map(|q| QuestionView {
                question: q.question,
                reasoning: q.reasoning,
            })
            .collect(),
        reasoning: questions.reasoning,
    }))
}

/// Fold answers into a clarified query
#[utoipa::path(
    post,
    path = "/api/v1/research/clarified",
    tag = "research",
    request_body = ClarifiedRequest,
    responses(
        (status = 200, description = "Clarified query", body = ClarifiedResponse),
        (status = 502, description = "Query processor failed", body = super::ApiResponse)
    )
)]
pub async fn clarified_query(
    State(state): State<SharedState>,
    Json(req): Json<ClarifiedRequest>,
) -> Result<Json<ClarifiedResponse>, ApiError> {
    let assistant = state.assistant().await;
    let clarified = assistant
        .clarifier()
        .clarify(&req.query, &req.answers)
        .await
        .map_err(|e| ApiError::upstream(e.to_string()))?;

    Ok(Json(ClarifiedResponse {
        original_query: clarified.original_query,
        clarified_query: clarified.clarified_query,
    }))
}
