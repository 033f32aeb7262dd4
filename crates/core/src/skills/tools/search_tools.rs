//! # Search Tools
//!
//! Web search for the research flow.
//!
//! - [`WebSearchTool`] - raw SearXNG lookup, registered on the search agent
//! - [`AgentSearch`] - the flow-facing [`SearchTool`]: a search agent that runs
//!   the lookup and condenses the hits into a short findings summary

use super::AgentTool;
use crate::skills::agent_definitions;
use crate::skills::invoker::{AgentInvoker, AgentSpec};
use anyhow::Context;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Search contract consumed by the research flow
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// Run one planned search; the text is a summary of what was found
    async fn search(&self, query: &str, reason: &str) -> anyhow::Result<String>;
}

/// Search the web through SearXNG instances
pub struct WebSearchTool {
    client: reqwest::Client,
    endpoints: Vec<String>,
    max_results: usize,
}

impl WebSearchTool {
    pub fn new(searxng_url: Option<&str>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("prodpilot/0.1")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoints: searxng_endpoints(searxng_url),
            max_results: 5,
        })
    }

    async fn query_searxng(&self, query: &str, max_results: usize) -> Option<Vec<serde_json::Value>> {
        for endpoint in &self.endpoints {
            let url = format!("{}?q={}&format=json", endpoint, urlencoding::encode(query));

            let response = match self.client.get(&url).send().await {
                Ok(r) => r,
                Err(e) => {
                    tracing::debug!("SearXNG endpoint {} unreachable: {}", endpoint, e);
                    continue;
                }
            };

            if let Ok(json) = response.json::<serde_json::Value>().await {
                if let Some(results) = json.get("results").and_then(|r| r.as_array()) {
                    let limited = results
                        .iter()
                        .take(max_results)
                        .map(|r| {
                            json!({
                                "title": r.get("title").and_then(|t| t.as_str()).unwrap_or(""),
                                "url": r.get("url").and_then(|u| u.as_str()).unwrap_or(""),
                                "snippet": r.get("content").and_then(|c| c.as_str()).unwrap_or("")
                            })
                        })
                        .collect();
                    return Some(limited);
                }
            }
        }

        None
    }
}

/// Endpoints to try, in order:
/// 1. configured URL, then `SEARXNG_URL`
/// 2. public instances
/// 3. local fallback
fn searxng_endpoints(configured: Option<&str>) -> Vec<String> {
    let mut endpoints = Vec::new();

    let custom = configured
        .map(str::to_string)
        .or_else(|| std::env::var("SEARXNG_URL").ok())
        .filter(|u| !u.trim().is_empty());
    if let Some(custom_url) = custom {
        endpoints.push(format!("{}/search", custom_url.trim_end_matches('/')));
    }

    endpoints.extend([
        "https://searx.be/search".to_string(),
        "https://search.sapti.me/search".to_string(),
        "https://searx.tiekoetter.com/search".to_string(),
    ]);

    endpoints.push("http://localhost:8888/search".to_string());
    endpoints
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct WebSearchArgs {
    /// Search terms
    pub query: String,
    /// Upper bound on returned results
    #[serde(default)]
    pub max_results: Option<u32>,
}

#[async_trait]
impl AgentTool for WebSearchTool {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn description(&self) -> &'static str {
        "Search the web for information. Returns search results with titles, URLs and snippets."
    }

    fn parameters(&self) -> serde_json::Value {
        schemars::schema_for!(WebSearchArgs).to_value()
    }

    async fn call(&self, args: serde_json::Value) -> anyhow::Result<String> {
        let args: WebSearchArgs = serde_json::from_value(args)
            .context("web_search requires a non-empty 'query' argument")?;
        let query = args.query.trim();
        if query.is_empty() {
            anyhow::bail!("web_search requires a non-empty 'query' argument");
        }
        let max_results = args
            .max_results
            .map(|m| m as usize)
            .unwrap_or(self.max_results);

        let body = match self.query_searxng(query, max_results).await {
            Some(results) => json!({
                "query": query,
                "source": "searxng",
                "results": results
            }),
            None => json!({
                "query": query,
                "source": "none",
                "results": [],
                "message": "No search backend available. Consider running SearXNG and setting SEARXNG_URL."
            }),
        };
        Ok(body.to_string())
    }
}

/// Search agent equipped with the web search tool
pub struct AgentSearch {
    invoker: Arc<dyn AgentInvoker>,
    agent: AgentSpec,
}

impl AgentSearch {
    /// Internal turns granted to one search (tool call + summary)
    const MAX_TURNS: u32 = 4;

    pub fn new(invoker: Arc<dyn AgentInvoker>, web: Arc<dyn AgentTool>) -> Self {
        Self {
            invoker,
            agent: agent_definitions::search_agent(web),
        }
    }
}

#[async_trait]
impl SearchTool for AgentSearch {
    async fn search(&self, query: &str, reason: &str) -> anyhow::Result<String> {
        let input = format!("Search term: {}\nReason for searching: {}", query, reason);
        let summary = self
            .invoker
            .text(&self.agent, input, Some(Self::MAX_TURNS))
            .await?;
        Ok(summary)
    }
}
