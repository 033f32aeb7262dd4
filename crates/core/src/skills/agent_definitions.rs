//! # Agent Definitions
//!
//! Every agent the assistant talks to, as an [`AgentSpec`]: name, instructions,
//! tools and output schema. Names double as the keys for per-agent model
//! overrides in the config.

use crate::skills::invoker::{AgentSpec, OutputSchema};
use crate::skills::prompts;
use crate::skills::tools::AgentTool;
use std::sync::Arc;

pub const RESEARCH_MANAGER: &str = "research_manager";
pub const PLANNER: &str = "planner";
pub const SEARCH: &str = "search";
pub const WRITER: &str = "writer";
pub const RESEARCH_CLARIFIER: &str = "research_clarifier";
pub const QUERY_PROCESSOR: &str = "query_processor";
pub const FEATURE_CLARIFIER: &str = "feature_clarifier";
pub const FEATURE_CREATOR: &str = "feature_creator";
pub const FEATURE_EVALUATOR: &str = "feature_evaluator";
pub const TECHNICAL_ANALYST: &str = "technical_analyst";
pub const BUSINESS_ANALYST: &str = "business_analyst";

/// All agent names, for config validation and the providers endpoint
pub const ALL_AGENTS: [&str; 11] = [
    RESEARCH_MANAGER,
    PLANNER,
    SEARCH,
    WRITER,
    RESEARCH_CLARIFIER,
    QUERY_PROCESSOR,
    FEATURE_CLARIFIER,
    FEATURE_CREATOR,
    FEATURE_EVALUATOR,
    TECHNICAL_ANALYST,
    BUSINESS_ANALYST,
];

/// The Research Manager ("Alex")
///
/// Conversational entry point during the research phase. Free text out;
/// runs the research flow through the `research_report` tool.
pub fn research_manager_agent(research_report: Arc<dyn AgentTool>) -> AgentSpec {
    AgentSpec::new(RESEARCH_MANAGER, prompts::RESEARCH_MANAGER).with_tool(research_report)
}

pub fn planner_agent() -> AgentSpec {
    AgentSpec::new(PLANNER, prompts::PLANNER).with_output(OutputSchema::SearchPlan)
}

/// One web search plus a short summary of the hits
pub fn search_agent(web_search: Arc<dyn AgentTool>) -> AgentSpec {
    AgentSpec::new(SEARCH, prompts::SEARCH).with_tool(web_search)
}

pub fn writer_agent() -> AgentSpec {
    AgentSpec::new(WRITER, prompts::WRITER).with_output(OutputSchema::Report)
}

pub fn research_clarifier_agent() -> AgentSpec {
    AgentSpec::new(RESEARCH_CLARIFIER, prompts::RESEARCH_CLARIFIER)
        .with_output(OutputSchema::ClarifyingQuestions)
}

pub fn query_processor_agent() -> AgentSpec {
    AgentSpec::new(QUERY_PROCESSOR, prompts::QUERY_PROCESSOR)
        .with_output(OutputSchema::ClarifiedQuery)
}

pub fn feature_clarifier_agent() -> AgentSpec {
    AgentSpec::new(FEATURE_CLARIFIER, prompts::FEATURE_CLARIFIER)
        .with_output(OutputSchema::ClarifyingQuestions)
}

pub fn feature_creator_agent() -> AgentSpec {
    AgentSpec::new(FEATURE_CREATOR, prompts::FEATURE_CREATOR)
        .with_output(OutputSchema::FeatureDefinition)
}

pub fn feature_evaluator_agent() -> AgentSpec {
    AgentSpec::new(FEATURE_EVALUATOR, prompts::FEATURE_EVALUATOR)
        .with_output(OutputSchema::FeatureEvaluation)
}

pub fn technical_analyst_agent() -> AgentSpec {
    AgentSpec::new(TECHNICAL_ANALYST, prompts::TECHNICAL_ANALYST)
}

pub fn business_analyst_agent() -> AgentSpec {
    AgentSpec::new(BUSINESS_ANALYST, prompts::BUSINESS_ANALYST)
}
