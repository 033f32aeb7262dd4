//! # Radkit Invoker
//!
//! Production [`AgentInvoker`] backed by radkit.
//!
//! Agents without tools run as a single `LlmFunction` call; agents with tools
//! run as an `LlmWorker` whose tools are `FunctionTool` closures wrapping each
//! [`AgentTool`]. The output schema picks the concrete structured type, and
//! `max_turns` caps the worker's tool iterations.

use crate::config::AssistantConfig;
use crate::skills::invoker::{AgentInvoker, AgentMessage, AgentReply, AgentRequest, OutputSchema};
use crate::skills::tools::AgentTool;
use crate::state::{
    ClarifiedQuery, ClarifyingQuestions, FeatureDefinition, FeatureEvaluation, Report, SearchPlan,
};
use crate::with_llm;
use async_trait::async_trait;
use radkit::agent::{LlmFunction, LlmWorker};
use radkit::tools::{FunctionTool, ToolResult};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

pub struct RadkitInvoker {
    config: AssistantConfig,
}

impl RadkitInvoker {
    pub fn new(config: AssistantConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AgentInvoker for RadkitInvoker {
    #[tracing::instrument(skip(self, request), fields(agent = request.agent.name))]
    async fn invoke(&self, request: AgentRequest) -> anyhow::Result<AgentReply> {
        let model = self.config.model_for(request.agent.name);
        tracing::debug!(
            provider = model.provider.id(),
            model = %model.model,
            max_turns = ?request.max_turns,
            "Invoking agent"
        );

        with_llm!(&model, llm => run_agent(llm, &request).await)
    }
}

/// Run `$request` against `$llm`, decoding into `$output`
macro_rules! run_as {
    ($llm:expr, $request:expr, $output:ty) => {{
        let request = $request;
        if request.agent.tools.is_empty() {
            LlmFunction::<$output>::new_with_system_instructions($llm, request.agent.instructions)
                .run(request.input.clone())
                .await?
        } else {
            let mut builder = LlmWorker::<$output>::builder($llm)
                .with_system_instructions(request.agent.instructions);
            if let Some(turns) = request.max_turns {
                builder = builder.with_max_iterations(turns as usize);
            }
            for tool in function_tools(&request.agent.tools) {
                builder = builder.with_tool(tool);
            }
            builder.build().run(request.input.clone()).await?
        }
    }};
}

async fn run_agent<L: radkit::models::BaseLlm + 'static>(
    llm: L,
    request: &AgentRequest,
) -> anyhow::Result<AgentReply> {
    let reply = match request.agent.output {
        OutputSchema::Text => AgentReply::Text(run_as!(llm, request, AgentMessage).message),
        OutputSchema::SearchPlan => structured(run_as!(llm, request, SearchPlan))?,
        OutputSchema::Report => structured(run_as!(llm, request, Report))?,
        OutputSchema::ClarifyingQuestions => {
            structured(run_as!(llm, request, ClarifyingQuestions))?
        }
        OutputSchema::ClarifiedQuery => structured(run_as!(llm, request, ClarifiedQuery))?,
        OutputSchema::FeatureDefinition => structured(run_as!(llm, request, FeatureDefinition))?,
        OutputSchema::FeatureEvaluation => structured(run_as!(llm, request, FeatureEvaluation))?,
    };
    Ok(reply)
}

fn structured<T: Serialize>(output: T) -> anyhow::Result<AgentReply> {
    Ok(AgentReply::Structured(serde_json::to_value(output)?))
}

/// Expose each agent tool to the worker as a radkit `FunctionTool`
fn function_tools(tools: &[Arc<dyn AgentTool>]) -> Vec<FunctionTool> {
    tools
        .iter()
        .map(|tool| {
            let tool = Arc::clone(tool);
            let schema = tool.parameters();
            FunctionTool::new(tool.name(), tool.description(), move |args, _ctx| {
                let tool = Arc::clone(&tool);
                Box::pin(async move {
                    let args = match serde_json::to_value(&args) {
                        Ok(args) => args,
                        Err(e) => return ToolResult::error(format!("Invalid arguments: {}", e)),
                    };
                    match tool.call(args).await {
                        Ok(output) => ToolResult::success(tool_output(output)),
                        Err(e) => {
                            tracing::warn!("Tool {} failed: {:#}", tool.name(), e);
                            ToolResult::error(format!("{} failed: {:#}", tool.name(), e))
                        }
                    }
                })
            })
            .with_parameters_schema(schema)
        })
        .collect()
}

/// Tools that already return JSON are passed through as JSON
fn tool_output(output: String) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(&output) {
        Ok(value) if value.is_object() || value.is_array() => value,
        _ => json!({ "result": output }),
    }
}
