//! Default agent instructions bundled at compile time.

/// Research manager ("Alex") - greets, researches, hands off to feature work
pub const RESEARCH_MANAGER: &str = include_str!("defaults/research_manager.md");

/// Planner - turns an idea into a bounded list of web searches
pub const PLANNER: &str = include_str!("defaults/planner.md");

/// Search - runs one web search and summarizes it
pub const SEARCH: &str = include_str!("defaults/search.md");

/// Writer - produces the product analysis report
pub const WRITER: &str = include_str!("defaults/writer.md");

/// Research clarifier - three questions before research starts
pub const RESEARCH_CLARIFIER: &str = include_str!("defaults/research_clarifier.md");

/// Query processor - folds clarifying answers into the research query
pub const QUERY_PROCESSOR: &str = include_str!("defaults/query_processor.md");

/// Feature clarifier - three scoping questions on the first feature turn
pub const FEATURE_CLARIFIER: &str = include_str!("defaults/feature_clarifier.md");

/// Feature creator - drafts the feature definition
pub const FEATURE_CREATOR: &str = include_str!("defaults/feature_creator.md");

/// Feature evaluator - go ahead / needs improvement review
pub const FEATURE_EVALUATOR: &str = include_str!("defaults/feature_evaluator.md");

/// Technical analyst - live feasibility assessment
pub const TECHNICAL_ANALYST: &str = include_str!("defaults/technical_analyst.md");

/// Business analyst - live impact assessment
pub const BUSINESS_ANALYST: &str = include_str!("defaults/business_analyst.md");

/// All default prompts with their agent names
pub fn all_defaults() -> Vec<(&'static str, &'static str)> {
    vec![
        ("research_manager", RESEARCH_MANAGER),
        ("planner", PLANNER),
        ("search", SEARCH),
        ("writer", WRITER),
        ("research_clarifier", RESEARCH_CLARIFIER),
        ("query_processor", QUERY_PROCESSOR),
        ("feature_clarifier", FEATURE_CLARIFIER),
        ("feature_creator", FEATURE_CREATOR),
        ("feature_evaluator", FEATURE_EVALUATOR),
        ("technical_analyst", TECHNICAL_ANALYST),
        ("business_analyst", BUSINESS_ANALYST),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_prompts_non_empty() {
        for (slug, content) in all_defaults() {
            assert!(!content.is_empty(), "Prompt '{}' should not be empty", slug);
            assert!(content.len() > 50, "Prompt '{}' seems too short", slug);
        }
    }

    #[test]
    fn test_prompt_count() {
        assert_eq!(all_defaults().len(), 11, "Should have 11 default prompts");
    }

    #[test]
    fn test_manager_prompt_carries_readiness_phrase() {
        assert!(RESEARCH_MANAGER.contains("Ready for MVP development"));
    }

    #[test]
    fn test_clarifiers_ask_for_three_questions() {
        assert!(RESEARCH_CLARIFIER.contains("exactly 3"));
        assert!(FEATURE_CLARIFIER.contains("exactly 3"));
    }
}
