//! # Errors
//!
//! Error taxonomy for the orchestration layer. Local recoverable failures
//! (a single search, email delivery) never reach this type; they are absorbed
//! where they happen. Everything here is scoped to the current turn.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    /// Network/API failure reported by the invocation boundary.
    #[error("agent '{agent}' failed: {reason}")]
    Agent { agent: String, reason: String },

    /// Structured output could not be decoded into the expected shape.
    #[error("agent '{agent}' returned an unusable result: {reason}")]
    Shape { agent: String, reason: String },

    #[error("tool '{tool}' failed: {reason}")]
    Tool { tool: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AssistantError {
    pub fn agent(agent: &str, reason: impl std::fmt::Display) -> Self {
        Self::Agent {
            agent: agent.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn shape(agent: &str, reason: impl std::fmt::Display) -> Self {
        Self::Shape {
            agent: agent.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T, E = AssistantError> = std::result::Result<T, E>;
