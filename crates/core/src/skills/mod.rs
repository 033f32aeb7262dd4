//! # Skills
//!
//! Agents, their instructions and tools, and the invocation boundary.
//!
//! ```text
//! AgentSpec (name + instructions + output schema)
//!   ├── tools: AgentTool (web_search, research_report)
//!   └── invoked through AgentInvoker (RadkitInvoker in production)
//! ```

pub mod agent_definitions;
pub mod invoker;
pub mod llm_helpers;
pub mod prompts;
pub mod radkit_invoker;
pub mod tools;

pub use invoker::{AgentInvoker, AgentReply, AgentRequest, AgentSpec, OutputSchema};
pub use radkit_invoker::RadkitInvoker;
