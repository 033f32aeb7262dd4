//! # Phase Controller
//!
//! Research -> FeatureDefinition, exactly once, never back.

use crate::state::{Phase, Transcript};

/// Lower-cased phrase the research manager uses to hand off
pub const READINESS_PHRASE: &str = "ready for mvp development";

/// Decide the phase for the turn being handled.
///
/// Call after appending the user's message: only the entry before it (the
/// previous assistant reply) is inspected.
pub fn decide_phase(current: Phase, transcript: &Transcript) -> Phase {
    if current == Phase::FeatureDefinition {
        return current;
    }

    match transcript.from_end(1) {
        Some(prior) if prior.content.to_lowercase().contains(READINESS_PHRASE) => {
            tracing::info!("Readiness phrase seen, switching to feature definition");
            Phase::FeatureDefinition
        }
        _ => current,
    }
}
