//! # Session
//!
//! Per-conversation state passed into and returned from each turn.
//! Nothing here is global; the caller decides where a session lives between turns.

use super::transcript::Transcript;
use serde::{Deserialize, Serialize};

/// Conversational mode of a session
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Research,
    FeatureDefinition,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Research => "research",
            Phase::FeatureDefinition => "feature_definition",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub transcript: Transcript,
    pub phase: Phase,
    /// Completed turns in the feature-definition phase
    pub feature_turns: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear transcript, phase and counters in one step
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
