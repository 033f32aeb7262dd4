//! # Orchestration
//!
//! The flows behind a chat turn.
//!
//! ```text
//! message -> Assistant::handle_turn -> decide_phase
//!              ├── Research: research manager (research_report -> ResearchPipeline)
//!              └── FeatureDefinition: FeatureWorkshop (questions | create <-> evaluate)
//! ```

pub mod clarify;
pub mod coordinator;
pub mod events;
pub mod feature;
pub mod phase;
pub mod pipeline;
pub mod research;

pub use clarify::QueryClarifier;
pub use coordinator::{Assistant, Turn};
pub use events::ResearchEvent;
pub use feature::{FeatureOutcome, FeatureWorkshop, StopReason};
pub use phase::{decide_phase, READINESS_PHRASE};
pub use pipeline::{RefinementPipeline, RefinementStage};
pub use research::{
    AgentSynthesizer, PlaceholderSynthesizer, ResearchPipeline, Synthesizer,
};
