use super::app;
use crate::state::{AppState, AssistantFactory, SharedState};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use prodpilot_core::config::AssistantConfig;
use prodpilot_core::skills::tools::SearchTool;
use prodpilot_core::skills::{AgentInvoker, AgentReply, AgentRequest};
use prodpilot_core::swarm::{Assistant, ResearchPipeline};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Canned replies per agent
struct StubInvoker;

#[async_trait]
impl AgentInvoker for StubInvoker {
    async fn invoke(&self, request: AgentRequest) -> anyhow::Result<AgentReply> {
        let reply = match request.agent.name {
            "research_manager" => AgentReply::Text("Hi, I'm Alex. What are you building?".into()),
            "planner" => AgentReply::Structured(json!({
                "searches": [
                    { "query": "meeting notes apps", "reason": "competitors" },
                    { "query": "meeting notes pricing", "reason": "pricing" }
                ]
            })),
            "writer" => AgentReply::Structured(json!({
                "short_summary": "Crowded market with room for niche tools.",
                "markdown_report": "# Meeting Notes Market\n\nFindings.",
                "follow_up_questions": ["Which niche first?"]
            })),
            "research_clarifier" => AgentReply::Structured(json!({
                "questions": [
                    { "question": "Who is the user?", "reasoning": "a" },
                    { "question": "Which platform?", "reasoning": "b" },
                    { "question": "What budget?", "reasoning": "c" }
                ],
                "reasoning": "scope"
            })),
            "query_processor" => AgentReply::Structured(json!({
                "original_query": "meeting notes",
                "clarified_query": "meeting notes for sales teams"
            })),
            other => anyhow::bail!("unexpected agent {}", other),
        };
        Ok(reply)
    }
}

struct StubSearch;

#[async_trait]
impl SearchTool for StubSearch {
    async fn search(&self, query: &str, _reason: &str) -> anyhow::Result<String> {
        Ok(format!("Results for {}", query))
    }
}

fn test_state(dir: &tempfile::TempDir, builds: Arc<AtomicUsize>) -> SharedState {
    let factory: AssistantFactory = Arc::new(move |config: &AssistantConfig| {
        builds.fetch_add(1, Ordering::SeqCst);
        let invoker: Arc<dyn AgentInvoker> = Arc::new(StubInvoker);
        let research = ResearchPipeline::new(invoker.clone(), Arc::new(StubSearch));
        Ok(Assistant::new(invoker, research, config))
    });
    let path = dir.path().join("config.json");
    Arc::new(AppState::new(AssistantConfig::default(), path, factory).unwrap())
}

fn router(dir: &tempfile::TempDir) -> Router {
    app(test_state(dir, Arc::new(AtomicUsize::new(0))))
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_chat_turn_creates_session() {
    let dir = tempfile::tempdir().unwrap();
    let router = router(&dir);

    let (status, body) = send(&router, "POST", "/api/v1/chat", Some(json!({ "message": "hello" }))).await;
    assert_eq!(status, StatusCode::OK);
    let reply: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(reply["reply"], "Hi, I'm Alex. What are you building?");
    assert_eq!(reply["phase"], "research");

    let id = reply["session_id"].as_str().unwrap();
    let (status, body) = send(&router, "GET", &format!("/api/v1/chat/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let view: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["messages"].as_array().unwrap().len(), 2);
    assert_eq!(view["messages"][0]["role"], "user");
    assert_eq!(view["messages"][1]["role"], "assistant");
}

#[tokio::test]
async fn test_turns_accumulate_in_one_session() {
    let dir = tempfile::tempdir().unwrap();
    let router = router(&dir);

    let body = json!({ "session_id": "abc", "message": "hello" });
    send(&router, "POST", "/api/v1/chat", Some(body.clone())).await;
    send(&router, "POST", "/api/v1/chat", Some(body)).await;

    let (_, body) = send(&router, "GET", "/api/v1/chat/abc", None).await;
    let view: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["messages"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(&router(&dir), "POST", "/api/v1/chat", Some(json!({ "message": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("\"success\":false"));
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let router = router(&dir);
    let (status, _) = send(&router, "GET", "/api/v1/chat/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&router, "POST", "/api/v1/chat/nope/reset", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reset_clears_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let router = router(&dir);
    send(&router, "POST", "/api/v1/chat", Some(json!({ "session_id": "s1", "message": "hi" }))).await;

    let (status, body) = send(&router, "POST", "/api/v1/chat/s1/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    let view: Value = serde_json::from_str(&body).unwrap();
    assert!(view["messages"].as_array().unwrap().is_empty());
    assert_eq!(view["phase"], "research");
    assert_eq!(view["feature_turns"], 0);
}

#[tokio::test]
async fn test_delete_session() {
    let dir = tempfile::tempdir().unwrap();
    let router = router(&dir);
    send(&router, "POST", "/api/v1/chat", Some(json!({ "session_id": "s2", "message": "hi" }))).await;

    let (status, body) = send(&router, "DELETE", "/api/v1/chat/s2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"success\":true"));

    let (status, _) = send(&router, "GET", "/api/v1/chat/s2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&router, "DELETE", "/api/v1/chat/s2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_research_stream_emits_progress_then_report() {
    let dir = tempfile::tempdir().unwrap();
    let (status, body) = send(
        &router(&dir),
        "GET",
        "/api/v1/research/stream?query=meeting%20notes",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("event: progress"));
    assert!(body.contains("Running 2 searches"));
    let report_at = body.find("event: report").unwrap();
    assert!(body[..report_at].contains("Product analysis complete"));
    assert!(body[report_at..].contains("Meeting Notes Market"));
    assert!(!body.contains("event: error"));
}

#[tokio::test]
async fn test_research_stream_requires_query() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _) = send(&router(&dir), "GET", "/api/v1/research/stream?query=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clarification_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let router = router(&dir);

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/research/clarify",
        Some(json!({ "query": "meeting notes" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let questions: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(questions["questions"].as_array().unwrap().len(), 3);

    let (status, body) = send(
        &router,
        "POST",
        "/api/v1/research/clarified",
        Some(json!({ "query": "meeting notes", "answers": ["sales", "web", "low"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let clarified: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(clarified["clarified_query"], "meeting notes for sales teams");
}

#[tokio::test]
async fn test_config_patch_persists_and_rebuilds() {
    let dir = tempfile::tempdir().unwrap();
    let builds = Arc::new(AtomicUsize::new(0));
    let router = app(test_state(&dir, builds.clone()));
    assert_eq!(builds.load(Ordering::SeqCst), 1);

    let (status, body) = send(
        &router,
        "PATCH",
        "/api/v1/config",
        Some(json!({ "max_refinement_cycles": 4, "global_model": "gpt-4o" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["config"]["max_refinement_cycles"], 4);
    assert_eq!(response["agents"].as_array().unwrap().len(), 11);
    assert_eq!(builds.load(Ordering::SeqCst), 2);

    let saved = AssistantConfig::load(&dir.path().join("config.json")).await;
    assert_eq!(saved.max_refinement_cycles, 4);
    assert_eq!(saved.global_model.as_deref(), Some("gpt-4o"));

    let (_, body) = send(&router, "GET", "/api/v1/config", None).await;
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["config"]["global_model"], "gpt-4o");
}

#[tokio::test]
async fn test_providers_and_openapi() {
    let dir = tempfile::tempdir().unwrap();
    let router = router(&dir);

    let (_, body) = send(&router, "GET", "/api/v1/providers", None).await;
    let providers: Value = serde_json::from_str(&body).unwrap();
    let providers = providers["providers"].as_array().unwrap();
    assert_eq!(providers.len(), 6);
    assert!(providers.iter().any(|p| p["id"] == "anthropic"));

    let (status, body) = send(&router, "GET", "/api/v1/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("/api/v1/chat"));
    assert!(body.contains("/api/v1/research/stream"));
}
