//! # Research Events
//!
//! Items of the research stream: progress notices, then exactly one report.

use crate::state::Report;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ResearchEvent {
    /// Human-readable notice of the stage about to run
    Progress(String),
    /// Terminal deliverable
    Report(Report),
}

impl ResearchEvent {
    pub fn progress(notice: impl Into<String>) -> Self {
        ResearchEvent::Progress(notice.into())
    }

    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            ResearchEvent::Progress(_) => "progress",
            ResearchEvent::Report(_) => "report",
        }
    }

    /// Text to show the user for this event
    pub fn display_text(&self) -> &str {
        match self {
            ResearchEvent::Progress(notice) => notice,
            ResearchEvent::Report(report) => &report.markdown_report,
        }
    }
}
