//! # Agent Invocation Boundary
//!
//! The single seam between orchestration and the LLM backend:
//! invoke agent A with input I, optionally enforcing output schema S,
//! within at most N internal turns.
//!
//! Flows only ever talk to [`AgentInvoker`]; the production implementation
//! lives in [`super::radkit_invoker`], tests script it.

use crate::errors::{AssistantError, Result};
use crate::skills::tools::AgentTool;
use async_trait::async_trait;
use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Output schema an agent must conform to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSchema {
    /// Free text
    Text,
    SearchPlan,
    Report,
    ClarifyingQuestions,
    ClarifiedQuery,
    FeatureDefinition,
    FeatureEvaluation,
}

/// Identity of an agent: name, fixed instructions, tools and output schema
#[derive(Clone)]
pub struct AgentSpec {
    pub name: &'static str,
    pub instructions: &'static str,
    pub tools: Vec<Arc<dyn AgentTool>>,
    pub output: OutputSchema,
}

impl AgentSpec {
    pub fn new(name: &'static str, instructions: &'static str) -> Self {
        Self {
            name,
            instructions,
            tools: Vec::new(),
            output: OutputSchema::Text,
        }
    }

    pub fn with_output(mut self, output: OutputSchema) -> Self {
        self.output = output;
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn AgentTool>) -> Self {
        self.tools.push(tool);
        self
    }
}

impl fmt::Debug for AgentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentSpec")
            .field("name", &self.name)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field("output", &self.output)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AgentRequest {
    pub agent: AgentSpec,
    pub input: String,
    /// Budget for the agent's internal reasoning/tool loop
    pub max_turns: Option<u32>,
}

/// Raw result of an invocation
#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    Text(String),
    Structured(serde_json::Value),
}

impl AgentReply {
    pub fn into_text(self) -> String {
        match self {
            AgentReply::Text(text) => text,
            AgentReply::Structured(value) => match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            },
        }
    }

    /// Decode into the expected shape; text replies are parsed as JSON
    pub fn decode<T: DeserializeOwned>(self, agent: &str) -> Result<T> {
        let decoded = match self {
            AgentReply::Structured(value) => serde_json::from_value(value),
            AgentReply::Text(text) => serde_json::from_str(strip_code_fence(&text)),
        };
        decoded.map_err(|e| AssistantError::shape(agent, e))
    }
}

/// Models sometimes wrap JSON in a markdown fence
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Free-text reply wrapper for backends that always produce structured output
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput)]
pub struct AgentMessage {
    /// The reply to show the user, in markdown
    pub message: String,
}

#[async_trait]
pub trait AgentInvoker: Send + Sync {
    async fn invoke(&self, request: AgentRequest) -> anyhow::Result<AgentReply>;
}

impl dyn AgentInvoker {
    /// Invoke and return free text
    pub async fn text(
        &self,
        agent: &AgentSpec,
        input: String,
        max_turns: Option<u32>,
    ) -> Result<String> {
        let reply = self
            .invoke(AgentRequest {
                agent: agent.clone(),
                input,
                max_turns,
            })
            .await
            .map_err(|e| AssistantError::agent(agent.name, e))?;
        Ok(reply.into_text())
    }

    /// Invoke and decode the result into `T`
    pub async fn structured<T: DeserializeOwned>(
        &self,
        agent: &AgentSpec,
        input: String,
    ) -> Result<T> {
        let reply = self
            .invoke(AgentRequest {
                agent: agent.clone(),
                input,
                max_turns: None,
            })
            .await
            .map_err(|e| AssistantError::agent(agent.name, e))?;
        reply.decode(agent.name)
    }
}
