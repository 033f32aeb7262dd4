//! # Feature Workshop
//!
//! The feature-definition loop. First turn: three scoping questions, no draft.
//! Later turns: draft, evaluate, redraft on feedback until the evaluator says
//! "Go ahead", the refinement cap is hit or the turn budget runs out. Whatever
//! happens, the last valid draft is returned.

use crate::errors::Result;
use crate::render::Reply;
use crate::skills::agent_definitions;
use crate::skills::invoker::{AgentInvoker, AgentSpec};
use crate::state::{ClarifyingQuestions, FeatureDefinition, FeatureEvaluation};
use crate::swarm::pipeline::{RefinementPipeline, RefinementStage};
use std::sync::Arc;

/// Shown when the budget ends the loop before any draft exists
pub const NO_DRAFT_NOTICE: &str = "I ran out of steps before I could draft the feature. \
     Could you add a bit more detail about the users and the problem, and I'll try again?";

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Accepted,
    CycleCap,
    TurnBudget,
}

#[derive(Debug, Clone)]
pub struct FeatureOutcome {
    /// Last draft produced, if any
    pub definition: Option<FeatureDefinition>,
    pub last_evaluation: Option<FeatureEvaluation>,
    pub drafts: u32,
    pub evaluations: u32,
    pub refinements: u32,
    pub stop: StopReason,
}

impl FeatureOutcome {
    pub fn into_reply(self) -> Reply {
        match self.definition {
            Some(definition) => Reply::Feature(definition),
            None => Reply::Text(NO_DRAFT_NOTICE.to_string()),
        }
    }
}

#[derive(Clone)]
pub struct FeatureWorkshop {
    invoker: Arc<dyn AgentInvoker>,
    clarifier: AgentSpec,
    creator: AgentSpec,
    evaluator: AgentSpec,
    max_refinements: u32,
    max_turns: u32,
}

impl FeatureWorkshop {
    pub fn new(invoker: Arc<dyn AgentInvoker>, max_refinements: u32, max_turns: u32) -> Self {
        Self {
            invoker,
            clarifier: agent_definitions::feature_clarifier_agent(),
            creator: agent_definitions::feature_creator_agent(),
            evaluator: agent_definitions::feature_evaluator_agent(),
            max_refinements,
            max_turns,
        }
    }

    /// Exactly three broad questions for the first feature turn
    #[tracing::instrument(skip_all)]
    pub async fn clarifying_questions(&self, context: &str) -> Result<ClarifyingQuestions> {
        let questions: ClarifyingQuestions = self
            .invoker
            .structured(&self.clarifier, context.to_string())
            .await?;
        questions.exactly_three(self.clarifier.name)
    }

    /// Run the bounded create/evaluate/refine loop over `context`
    #[tracing::instrument(skip_all, fields(max_refinements = self.max_refinements, max_turns = self.max_turns))]
    pub async fn develop_feature(&self, context: &str) -> Result<FeatureOutcome> {
        let mut pipeline = RefinementPipeline::new(self.max_refinements, self.max_turns);
        let mut latest: Option<FeatureDefinition> = None;
        let mut last_evaluation: Option<FeatureEvaluation> = None;
        let mut drafts = 0;
        let mut evaluations = 0;

        while !pipeline.is_complete() {
            if !pipeline.spend_turn() {
                tracing::warn!(
                    "Feature turn budget of {} exhausted after {} drafts",
                    self.max_turns,
                    drafts
                );
                break;
            }

            match pipeline.stage {
                RefinementStage::Drafting => {
                    let input = creator_input(context, latest.as_ref(), last_evaluation.as_ref());
                    let draft: FeatureDefinition =
                        self.invoker.structured(&self.creator, input).await?;
                    drafts += 1;
                    tracing::debug!("Draft {} produced: {}", drafts, draft.name);
                    latest = Some(draft);
                    pipeline.drafted();
                }
                RefinementStage::Evaluating => {
                    let Some(draft) = latest.as_ref() else {
                        pipeline.stage = RefinementStage::Drafting;
                        continue;
                    };
                    let input = serde_json::to_string_pretty(draft)?;
                    let evaluation = self
                        .invoker
                        .structured::<FeatureEvaluation>(&self.evaluator, input)
                        .await?
                        .validated(self.evaluator.name)?;
                    evaluations += 1;

                    if evaluation.is_go_ahead() {
                        pipeline.accept();
                    } else if !pipeline.reject() {
                        tracing::info!(
                            "Refinement cap of {} reached, returning last draft",
                            self.max_refinements
                        );
                    }
                    last_evaluation = Some(evaluation);
                }
                _ => break,
            }
        }

        let stop = match pipeline.stage {
            RefinementStage::Accepted => StopReason::Accepted,
            RefinementStage::CycleCapReached => StopReason::CycleCap,
            _ => StopReason::TurnBudget,
        };

        Ok(FeatureOutcome {
            definition: latest,
            last_evaluation,
            drafts,
            evaluations,
            refinements: pipeline.refinements,
            stop,
        })
    }
}

/// Conversation context, plus the previous draft and its review when redrafting
fn creator_input(
    context: &str,
    previous: Option<&FeatureDefinition>,
    evaluation: Option<&FeatureEvaluation>,
) -> String {
    let mut input = context.to_string();

    let feedback = evaluation.map(|e| e.feedback.as_slice()).unwrap_or_default();
    if feedback.is_empty() {
        return input;
    }

    if let Some(previous) = previous.and_then(|p| serde_json::to_string_pretty(p).ok()) {
        input.push_str("\n\nPrevious draft:\n");
        input.push_str(&previous);
    }
    input.push_str("\n\nReviewer feedback to address:\n");
    for item in feedback {
        input.push_str("- ");
        input.push_str(item);
        input.push('\n');
    }
    input
}
