//! # Research Types
//!
//! Structured outputs of the planner, writer and clarifier agents.

use crate::errors::{AssistantError, Result};
use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single planned web search
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput, PartialEq)]
pub struct SearchItem {
    /// The search term to use for the web search
    pub query: String,
    /// Why this search matters for the product analysis
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, LLMOutput, PartialEq)]
pub struct SearchPlan {
    /// Searches to perform, most important first
    pub searches: Vec<SearchItem>,
}

impl SearchPlan {
    /// Drop blank queries and keep at most `max` searches
    pub fn bounded(mut self, max: usize) -> Self {
        self.searches.retain(|s| !s.query.trim().is_empty());
        self.searches.truncate(max);
        self
    }
}

/// Final deliverable of a research run
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, LLMOutput, PartialEq)]
pub struct Report {
    /// Two or three sentence summary of the findings
    pub short_summary: String,
    /// The full product analysis report in markdown
    pub markdown_report: String,
    /// Suggested topics to research further
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
}

impl Report {
    pub fn email_subject(&self) -> String {
        let headline = self
            .short_summary
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("Product analysis report")
            .trim();
        let mut subject: String = headline.chars().take(80).collect();
        if headline.chars().count() > 80 {
            subject.push_str("...");
        }
        format!("Product analysis: {}", subject)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput, PartialEq)]
pub struct ClarifyingQuestion {
    /// The clarifying question to ask the user
    pub question: String,
    /// Why this question matters for the analysis
    #[serde(default)]
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput, PartialEq)]
pub struct ClarifyingQuestions {
    /// Exactly three clarifying questions
    pub questions: Vec<ClarifyingQuestion>,
    /// Why these questions were chosen
    #[serde(default)]
    pub reasoning: String,
}

impl ClarifyingQuestions {
    pub const REQUIRED: usize = 3;

    /// Keep the first three non-blank questions; fewer is an unusable result
    pub fn exactly_three(mut self, agent: &str) -> Result<Self> {
        self.questions.retain(|q| !q.question.trim().is_empty());
        if self.questions.len() < Self::REQUIRED {
            return Err(AssistantError::shape(
                agent,
                format!(
                    "expected {} clarifying questions, got {}",
                    Self::REQUIRED,
                    self.questions.len()
                ),
            ));
        }
        self.questions.truncate(Self::REQUIRED);
        Ok(self)
    }
}

/// A research query enriched with the user's answers
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput, PartialEq)]
pub struct ClarifiedQuery {
    /// The user's original query
    pub original_query: String,
    /// The enhanced query including the clarifying context
    pub clarified_query: String,
}
