//! # Rendering
//!
//! Turns flow results into the markdown shown to the user.

use crate::state::{ClarifyingQuestions, FeatureDefinition};

/// What a flow hands back to the chat surface
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Feature(FeatureDefinition),
    Text(String),
}

pub fn render(reply: &Reply) -> String {
    match reply {
        Reply::Feature(definition) => render_feature(definition),
        Reply::Text(text) => text.clone(),
    }
}

/// Sections in fixed order; empty ones are left out entirely
pub fn render_feature(definition: &FeatureDefinition) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if !definition.name.trim().is_empty() {
        blocks.push(format!("# {}", definition.name.trim()));
    }
    push_bullets(&mut blocks, "Target Users", &definition.target_users);

    let core: Vec<&str> = non_empty(&definition.core_features).collect();
    if !core.is_empty() {
        // Each core feature is already a markdown document
        blocks.push(format!("## Core Features\n\n{}", core.join("\n\n")));
    }

    push_bullets(&mut blocks, "Competition", &definition.competition);
    push_bullets(&mut blocks, "Acceptance Criteria", &definition.acceptance_criteria);
    push_bullets(&mut blocks, "Success Metrics", &definition.success_metrics);

    blocks.join("\n\n")
}

fn push_bullets(blocks: &mut Vec<String>, heading: &str, items: &[String]) {
    let bullets: Vec<String> = non_empty(items).map(|item| format!("- {}", item)).collect();
    if !bullets.is_empty() {
        blocks.push(format!("## {}\n\n{}", heading, bullets.join("\n")));
    }
}

fn non_empty(items: &[String]) -> impl Iterator<Item = &str> {
    items.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// `Q1: ...` through `Q3: ...`, one per line, after a short lead-in
pub fn render_questions(questions: &ClarifyingQuestions) -> String {
    let mut out =
        String::from("Before I draft the feature, help me narrow the scope:\n");
    for (i, q) in questions.questions.iter().enumerate() {
        out.push_str(&format!("\nQ{}: {}", i + 1, q.question.trim()));
    }
    out
}
