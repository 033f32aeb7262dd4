//! # Query Clarification
//!
//! Optional step before research: ask three questions about the idea, then
//! fold the user's answers into a sharper research query.

use crate::errors::{AssistantError, Result};
use crate::skills::agent_definitions;
use crate::skills::invoker::AgentInvoker;
use crate::state::{ClarifiedQuery, ClarifyingQuestions};
use std::sync::Arc;

#[derive(Clone)]
pub struct QueryClarifier {
    invoker: Arc<dyn AgentInvoker>,
}

impl QueryClarifier {
    pub fn new(invoker: Arc<dyn AgentInvoker>) -> Self {
        Self { invoker }
    }

    #[tracing::instrument(skip(self))]
    pub async fn questions(&self, query: &str) -> Result<ClarifyingQuestions> {
        let agent = agent_definitions::research_clarifier_agent();
        let input = format!(
            "Generate exactly 3 clarifying questions for this research query: {}",
            query
        );
        let questions: ClarifyingQuestions = self.invoker.structured(&agent, input).await?;
        questions.exactly_three(agent.name)
    }

    /// Build the clarified query; answers are matched to questions by position
    #[tracing::instrument(skip(self, answers), fields(answers = answers.len()))]
    pub async fn clarify(&self, query: &str, answers: &[String]) -> Result<ClarifiedQuery> {
        let agent = agent_definitions::query_processor_agent();
        let answers_text = answers
            .iter()
            .enumerate()
            .map(|(i, answer)| format!("Answer {}: {}", i + 1, answer.trim()))
            .collect::<Vec<_>>()
            .join("\n");
        let input = format!(
            "Create a clarified query from the original: '{}' with the user's answers:\n{}",
            query, answers_text
        );

        let mut clarified: ClarifiedQuery = self.invoker.structured(&agent, input).await?;
        if clarified.clarified_query.trim().is_empty() {
            return Err(AssistantError::shape(agent.name, "empty clarified query"));
        }
        if clarified.original_query.trim().is_empty() {
            clarified.original_query = query.to_string();
        }
        Ok(clarified)
    }
}
