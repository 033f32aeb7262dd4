//! In-memory collaborators for flow tests.

use crate::skills::invoker::{AgentInvoker, AgentReply, AgentRequest};
use crate::skills::tools::{Mailer, SearchTool};
use crate::swarm::research::ResearchPipeline;
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

/// Replies scripted per agent name.
///
/// Queued replies are consumed in order; the last one repeats forever.
#[derive(Default)]
pub struct ScriptedInvoker {
    scripts: Mutex<HashMap<String, VecDeque<Result<AgentReply, String>>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, agent: &str, reply: AgentReply) -> Self {
        self.push(agent, Ok(reply))
    }

    pub fn fail(self, agent: &str, error: &str) -> Self {
        self.push(agent, Err(error.to_string()))
    }

    fn push(self, agent: &str, entry: Result<AgentReply, String>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(agent.to_string())
            .or_default()
            .push_back(entry);
        self
    }

    /// Inputs received by `agent`, in call order
    pub fn calls_for(&self, agent: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == agent)
            .map(|(_, input)| input.clone())
            .collect()
    }

    pub fn count(&self, agent: &str) -> usize {
        self.calls_for(agent).len()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AgentInvoker for ScriptedInvoker {
    async fn invoke(&self, request: AgentRequest) -> anyhow::Result<AgentReply> {
        let agent = request.agent.name;
        self.calls
            .lock()
            .unwrap()
            .push((agent.to_string(), request.input));

        let mut scripts = self.scripts.lock().unwrap();
        let queue = scripts
            .get_mut(agent)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| anyhow::anyhow!("no scripted reply for agent '{}'", agent))?;
        let entry = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue[0].clone()
        };
        entry.map_err(|e| anyhow::anyhow!(e))
    }
}

/// Search that answers `Results for <query>` unless told otherwise
#[derive(Clone, Default)]
pub struct FakeSearch {
    failing: HashSet<String>,
    empty: HashSet<String>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl FakeSearch {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.insert(query.to_string());
        self
    }

    pub fn empty_on(mut self, query: &str) -> Self {
        self.empty.insert(query.to_string());
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTool for FakeSearch {
    async fn search(&self, query: &str, _reason: &str) -> anyhow::Result<String> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.failing.contains(query) {
            anyhow::bail!("search backend unavailable for '{}'", query);
        }
        if self.empty.contains(query) {
            return Ok(String::new());
        }
        Ok(format!("Results for {}", query))
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, subject: &str, body: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("smtp unavailable");
        }
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

pub fn research_pipeline(
    invoker: Arc<ScriptedInvoker>,
    search: FakeSearch,
    mailer: Option<Arc<RecordingMailer>>,
) -> ResearchPipeline {
    let pipeline = ResearchPipeline::new(invoker, Arc::new(search));
    match mailer {
        Some(mailer) => pipeline.with_mailer(mailer),
        None => pipeline,
    }
}

/// A complete feature definition reply named `name`
pub fn definition_reply(name: &str) -> AgentReply {
    AgentReply::Structured(json!({
        "feature_name": name,
        "target_users": ["Operations managers watching service health"],
        "core_features": [
            "# Metric Tile\nShows one live metric.\n\n## User Flow\n1. Pick a metric\n2. Place the tile",
            "# Threshold Highlight\nColors the tile when a limit is crossed."
        ],
        "competition": ["Grafana: powerful but heavy to configure"],
        "acceptance_criteria": [
            "Tile refreshes within 5 seconds of new data",
            "Threshold colors change within one refresh",
            "Board with 20 tiles loads in under 2 seconds"
        ],
        "success_metrics": [
            "60% of active teams add a tile in the first month",
            "Median time to first tile under 3 minutes",
            "Incident detection time reduced by 20%"
        ]
    }))
}
