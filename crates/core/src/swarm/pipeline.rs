//! # Refinement Pipeline
//!
//! Bookkeeping for the feature create/evaluate loop: which step runs next,
//! how many refinement cycles were spent and how many agent turns remain.

use serde::{Deserialize, Serialize};

/// Stage of the refinement loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementStage {
    /// Creator drafting (or redrafting) the definition
    Drafting,
    /// Evaluator reviewing the latest draft
    Evaluating,
    /// Evaluator said "Go ahead"
    Accepted,
    /// Refinement cycles used up without a "Go ahead"
    CycleCapReached,
    /// Agent turn budget used up
    BudgetExhausted,
}

#[derive(Debug, Clone)]
pub struct RefinementPipeline {
    pub stage: RefinementStage,
    /// Redrafts requested by the evaluator so far
    pub refinements: u32,
    pub max_refinements: u32,
    /// Agent invocations made this turn
    pub turns_used: u32,
    pub max_turns: u32,
}

impl RefinementPipeline {
    pub fn new(max_refinements: u32, max_turns: u32) -> Self {
        Self {
            stage: RefinementStage::Drafting,
            refinements: 0,
            max_refinements,
            turns_used: 0,
            max_turns,
        }
    }

    /// Reserve one agent invocation; exhausts the pipeline when none is left
    pub fn spend_turn(&mut self) -> bool {
        if self.turns_used >= self.max_turns {
            self.stage = RefinementStage::BudgetExhausted;
            return false;
        }
        self.turns_used += 1;
        true
    }

    /// Draft produced, hand it to the evaluator
    pub fn drafted(&mut self) {
        self.stage = RefinementStage::Evaluating;
    }

    pub fn accept(&mut self) {
        self.stage = RefinementStage::Accepted;
    }

    /// Evaluator asked for changes - loop back to drafting if cycles remain
    pub fn reject(&mut self) -> bool {
        if self.refinements >= self.max_refinements {
            self.stage = RefinementStage::CycleCapReached;
            false
        } else {
            self.refinements += 1;
            self.stage = RefinementStage::Drafting;
            true
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(
            self.stage,
            RefinementStage::Accepted
                | RefinementStage::CycleCapReached
                | RefinementStage::BudgetExhausted
        )
    }
}
