//! # ProdPilot Core
//!
//! Orchestration for a conversational product-management assistant: research
//! a product idea, then shape it into an engineering-ready feature definition.
//! All model work goes through [`skills::AgentInvoker`].
//!
//! ## Architecture
//!
//! - `skills/` - agent definitions, prompts, tools and the radkit backend
//! - `state/` - session, transcript and structured agent outputs
//! - `swarm/` - phase control, research stream, feature loop, turn handling
//! - `render` - markdown for the chat surface
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prodpilot_core::{config::AssistantConfig, state::Session, swarm::Assistant};
//!
//! let assistant = Assistant::from_config(&AssistantConfig::default())?;
//! let turn = assistant.handle_turn(Session::new(), "I have an idea for a dashboard").await;
//! println!("{}", turn.reply);
//! ```

pub mod config;
pub mod errors;
pub mod models;
pub mod render;
pub mod skills;
pub mod state;
pub mod swarm;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{AssistantError, Result};
