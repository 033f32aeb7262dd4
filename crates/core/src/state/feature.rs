//! # Feature Definition Types
//!
//! Structured outputs of the feature creator and evaluator agents.
//! Field docs double as schema descriptions sent to the model.

use crate::errors::{AssistantError, Result};
use radkit::macros::LLMOutput;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An engineering-ready feature specification
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, LLMOutput, PartialEq)]
pub struct FeatureDefinition {
    /// Creative, descriptive name for the feature
    #[serde(rename = "feature_name", alias = "name")]
    pub name: String,
    /// Specific user segments and personas, with the pain points addressed
    #[serde(default)]
    pub target_users: Vec<String>,
    /// Essential capabilities, each a markdown document with Description, User Flow,
    /// Technical Scope, Acceptance Criteria, Workflow Inspiration and Success Metric sections
    #[serde(default)]
    pub core_features: Vec<String>,
    /// Competitive landscape and differentiation
    #[serde(default)]
    pub competition: Vec<String>,
    /// QA-testable completion and validation criteria
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    /// Measurable success criteria and KPIs
    #[serde(default)]
    pub success_metrics: Vec<String>,
}

/// Verdict of the evaluator agent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, LLMOutput, PartialEq, Eq)]
pub enum Decision {
    #[serde(rename = "Go ahead", alias = "go ahead", alias = "GoAhead", alias = "go_ahead")]
    GoAhead,
    #[serde(
        rename = "Needs improvement",
        alias = "needs improvement",
        alias = "NeedsImprovement",
        alias = "needs_improvement"
    )]
    NeedsImprovement,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, LLMOutput, PartialEq)]
pub struct FeatureEvaluation {
    /// Either "Go ahead" or "Needs improvement"
    pub decision: Decision,
    /// Actionable suggestions; empty when the decision is "Go ahead"
    #[serde(default)]
    pub feedback: Vec<String>,
}

impl FeatureEvaluation {
    pub fn go_ahead() -> Self {
        Self {
            decision: Decision::GoAhead,
            feedback: Vec::new(),
        }
    }

    pub fn needs_improvement(feedback: Vec<String>) -> Self {
        Self {
            decision: Decision::NeedsImprovement,
            feedback,
        }
    }

    pub fn is_go_ahead(&self) -> bool {
        self.decision == Decision::GoAhead
    }

    /// Enforce the feedback invariant on a freshly decoded evaluation.
    ///
    /// Feedback attached to a "Go ahead" is dropped; "Needs improvement"
    /// without feedback is an unusable result.
    pub fn validated(mut self, agent: &str) -> Result<Self> {
        self.feedback.retain(|f| !f.trim().is_empty());
        match self.decision {
            Decision::GoAhead if !self.feedback.is_empty() => {
                tracing::debug!(
                    "Dropping {} feedback items attached to a go-ahead",
                    self.feedback.len()
                );
                self.feedback.clear();
                Ok(self)
            }
            Decision::NeedsImprovement if self.feedback.is_empty() => Err(AssistantError::shape(
                agent,
                "'Needs improvement' decision without any feedback",
            )),
            _ => Ok(self),
        }
    }
}
