//! # Agent Tools
//!
//! Narrow async operations registered on an [`AgentSpec`](super::invoker::AgentSpec).
//! The backend exposes each one to the model under its `name`.

pub mod email_tools;
pub mod research_tools;
pub mod search_tools;

use async_trait::async_trait;

pub use email_tools::{Mailer, SendGridMailer};
pub use research_tools::ResearchReportTool;
pub use search_tools::{AgentSearch, SearchTool, WebSearchTool};

#[async_trait]
pub trait AgentTool: Send + Sync {
    fn name(&self) -> &'static str;

    /// Shown to the model; describe the arguments it should pass
    fn description(&self) -> &'static str;

    /// JSON Schema of the arguments object
    fn parameters(&self) -> serde_json::Value;

    /// Errors are reported back to the model as a failed tool call
    async fn call(&self, args: serde_json::Value) -> anyhow::Result<String>;
}
