//! # Research Tools
//!
//! Lets the research manager run the full research flow as a tool call.

use super::AgentTool;
use crate::swarm::research::ResearchPipeline;
use anyhow::Context;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ResearchReportArgs {
    /// The product or feature idea to research
    pub query: String,
}

pub struct ResearchReportTool {
    pipeline: ResearchPipeline,
}

impl ResearchReportTool {
    pub fn new(pipeline: ResearchPipeline) -> Self {
        Self { pipeline }
    }
}

#[async_trait]
impl AgentTool for ResearchReportTool {
    fn name(&self) -> &'static str {
        "research_report"
    }

    fn description(&self) -> &'static str {
        "Conduct market and product research on a feature idea. Returns the full markdown analysis report."
    }

    fn parameters(&self) -> serde_json::Value {
        schemars::schema_for!(ResearchReportArgs).to_value()
    }

    /// A failed run is reported to the agent as text so it can tell the user
    async fn call(&self, args: serde_json::Value) -> anyhow::Result<String> {
        let args: ResearchReportArgs = serde_json::from_value(args)
            .context("research_report requires a non-empty 'query' argument")?;
        let query = args.query.trim();
        if query.is_empty() {
            anyhow::bail!("research_report requires a non-empty 'query' argument");
        }

        match self.pipeline.report(query, None).await {
            Ok(report) => Ok(report.markdown_report),
            Err(e) => {
                tracing::warn!("Research run failed: {}", e);
                Ok(format!("Error conducting research: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::invoker::AgentReply;
    use crate::test_support::{research_pipeline, FakeSearch, ScriptedInvoker};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_returns_report_markdown() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply(
                    "planner",
                    AgentReply::Structured(json!({
                        "searches": [{ "query": "widgets", "reason": "market" }]
                    })),
                )
                .reply(
                    "writer",
                    AgentReply::Structured(json!({
                        "short_summary": "Widgets are hot.",
                        "markdown_report": "# Widgets\nBig market.",
                        "follow_up_questions": []
                    })),
                ),
        );
        let tool = ResearchReportTool::new(research_pipeline(invoker, FakeSearch::ok(), None));

        let out = tool.call(json!({ "query": "widgets" })).await.unwrap();
        assert_eq!(out, "# Widgets\nBig market.");
    }

    #[tokio::test]
    async fn test_failure_becomes_error_text() {
        let invoker = Arc::new(
            ScriptedInvoker::new().reply("planner", AgentReply::Text("no plan today".into())),
        );
        let tool = ResearchReportTool::new(research_pipeline(invoker, FakeSearch::ok(), None));

        let out = tool.call(json!({ "query": "widgets" })).await.unwrap();
        assert!(out.starts_with("Error conducting research: "));
        assert!(out.contains("planner"));
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected() {
        let invoker = Arc::new(ScriptedInvoker::new());
        let tool = ResearchReportTool::new(research_pipeline(invoker, FakeSearch::ok(), None));

        let err = tool.call(json!({ "query": "   " })).await.unwrap_err();
        assert!(err.to_string().contains("query"));
        assert!(tool.call(json!({})).await.is_err());
    }

    #[test]
    fn test_parameters_require_query() {
        let tool = ResearchReportTool::new(research_pipeline(
            Arc::new(ScriptedInvoker::new()),
            FakeSearch::ok(),
            None,
        ));
        let schema = tool.parameters();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["query"]));
        assert!(schema["properties"]["query"].is_object());
    }
}
