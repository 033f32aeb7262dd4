//! # Assistant Coordinator
//!
//! One user turn in, one rendered reply out. The session travels with the
//! turn: callers hand it in, get the updated one back, and keep it wherever
//! they like between turns.

use crate::config::AssistantConfig;
use crate::render::{render, render_questions, Reply};
use crate::skills::agent_definitions;
use crate::skills::invoker::{AgentInvoker, AgentSpec};
use crate::skills::radkit_invoker::RadkitInvoker;
use crate::skills::tools::ResearchReportTool;
use crate::state::{Phase, Session};
use crate::swarm::clarify::QueryClarifier;
use crate::swarm::feature::FeatureWorkshop;
use crate::swarm::phase::decide_phase;
use crate::swarm::research::ResearchPipeline;
use std::sync::Arc;

/// Result of one turn
#[derive(Debug, Clone)]
pub struct Turn {
    pub session: Session,
    pub reply: String,
}

#[derive(Clone)]
pub struct Assistant {
    invoker: Arc<dyn AgentInvoker>,
    research_manager: AgentSpec,
    research: ResearchPipeline,
    workshop: FeatureWorkshop,
    clarifier: QueryClarifier,
    max_agent_turns: u32,
}

impl Assistant {
    pub fn new(
        invoker: Arc<dyn AgentInvoker>,
        research: ResearchPipeline,
        config: &AssistantConfig,
    ) -> Self {
        let research_manager = agent_definitions::research_manager_agent(Arc::new(
            ResearchReportTool::new(research.clone()),
        ));

        Self {
            research_manager,
            workshop: FeatureWorkshop::new(
                invoker.clone(),
                config.max_refinement_cycles,
                config.max_feature_turns,
            ),
            clarifier: QueryClarifier::new(invoker.clone()),
            research,
            invoker,
            max_agent_turns: config.max_agent_turns,
        }
    }

    /// Production wiring over radkit
    pub fn from_config(config: &AssistantConfig) -> anyhow::Result<Self> {
        let invoker: Arc<dyn AgentInvoker> = Arc::new(RadkitInvoker::new(config.clone()));
        let research = ResearchPipeline::from_config(invoker.clone(), config)?;
        Ok(Self::new(invoker, research, config))
    }

    pub fn research(&self) -> &ResearchPipeline {
        &self.research
    }

    pub fn clarifier(&self) -> &QueryClarifier {
        &self.clarifier
    }

    /// Handle one user message.
    ///
    /// Agent failures become the reply text; the session always survives.
    #[tracing::instrument(skip_all, fields(phase = session.phase.as_str(), history = session.transcript.len()))]
    pub async fn handle_turn(&self, mut session: Session, message: &str) -> Turn {
        let context = session.transcript.context_for(message);

        session.transcript.push_user(message);
        session.phase = decide_phase(session.phase, &session.transcript);

        let reply = match session.phase {
            Phase::Research => self.research_turn(context).await,
            Phase::FeatureDefinition => self.feature_turn(&mut session, &context).await,
        };

        session.transcript.push_assistant(reply.clone());
        Turn { session, reply }
    }

    async fn research_turn(&self, context: String) -> String {
        match self
            .invoker
            .text(&self.research_manager, context, Some(self.max_agent_turns))
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Research turn failed: {}", e);
                format!("Error in conversation: {}", e)
            }
        }
    }

    async fn feature_turn(&self, session: &mut Session, context: &str) -> String {
        let result = if session.feature_turns == 0 {
            self.workshop
                .clarifying_questions(context)
                .await
                .map(|questions| render_questions(&questions))
        } else {
            self.workshop
                .develop_feature(context)
                .await
                .map(|outcome| {
                    tracing::info!(
                        "Feature loop stopped ({:?}) after {} drafts and {} evaluations",
                        outcome.stop,
                        outcome.drafts,
                        outcome.evaluations
                    );
                    render(&outcome.into_reply())
                })
        };

        match result {
            Ok(text) => {
                session.feature_turns += 1;
                text
            }
            Err(e) => {
                tracing::warn!("Feature turn failed: {}", e);
                render(&Reply::Text(format!("Error processing feature request: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::invoker::AgentReply;
    use crate::state::Role;
    use crate::test_support::{definition_reply, research_pipeline, FakeSearch, ScriptedInvoker};
    use serde_json::json;

    fn assistant(invoker: Arc<ScriptedInvoker>) -> Assistant {
        let research = research_pipeline(invoker.clone(), FakeSearch::ok(), None);
        Assistant::new(invoker, research, &AssistantConfig::default())
    }

    fn feature_session() -> Session {
        let mut session = Session::new();
        session.transcript.push_user("I'm ready");
        session
            .transcript
            .push_assistant("Great. Ready for MVP development.");
        session
    }

    fn three_questions() -> AgentReply {
        AgentReply::Structured(json!({
            "questions": [
                { "question": "Who uses the dashboard?", "reasoning": "users" },
                { "question": "What decision does the widget support?", "reasoning": "value" },
                { "question": "Where does the data come from?", "reasoning": "scope" }
            ],
            "reasoning": "narrow scope"
        }))
    }

    #[tokio::test]
    async fn test_research_turn_appends_both_messages() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("research_manager", AgentReply::Text("Hi, I'm Alex.".into())),
        );

        let turn = assistant(invoker.clone())
            .handle_turn(Session::new(), "hello")
            .await;

        assert_eq!(turn.reply, "Hi, I'm Alex.");
        assert_eq!(turn.session.phase, Phase::Research);
        let messages = turn.session.transcript.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].content, "Hi, I'm Alex.");
        // Empty history: the manager sees the bare message
        assert_eq!(invoker.calls_for("research_manager")[0], "hello");
    }

    #[tokio::test]
    async fn test_research_failure_is_reported_and_session_survives() {
        let invoker = Arc::new(ScriptedInvoker::new().fail("research_manager", "API timeout"));

        let turn = assistant(invoker).handle_turn(Session::new(), "hello").await;

        assert!(turn.reply.starts_with("Error in conversation: "));
        assert!(turn.reply.contains("API timeout"));
        assert_eq!(turn.session.transcript.len(), 2);
    }

    #[tokio::test]
    async fn test_readiness_phrase_switches_to_feature_flow() {
        let invoker = Arc::new(
            ScriptedInvoker::new().reply("feature_clarifier", three_questions()),
        );

        let turn = assistant(invoker.clone())
            .handle_turn(feature_session(), "Yes, let's go")
            .await;

        assert_eq!(turn.session.phase, Phase::FeatureDefinition);
        assert_eq!(invoker.count("research_manager"), 0);
        assert_eq!(turn.session.feature_turns, 1);
    }

    #[tokio::test]
    async fn test_dashboard_widget_scenario() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("feature_clarifier", three_questions())
                .reply("feature_creator", definition_reply("Dashboard Widget"))
                .reply("feature_evaluator", AgentReply::Structured(json!({
                    "decision": "Go ahead",
                    "feedback": []
                }))),
        );
        let assistant = assistant(invoker.clone());

        let first = assistant
            .handle_turn(feature_session(), "Build a dashboard widget")
            .await;
        assert!(first.reply.contains("Q1: Who uses the dashboard?"));
        assert!(first.reply.contains("Q2: "));
        assert!(first.reply.contains("Q3: "));
        assert!(!first.reply.contains("Q4"));
        assert_eq!(invoker.count("feature_creator"), 0);

        let second = assistant
            .handle_turn(
                first.session,
                "Ops managers; spotting incidents early; our metrics API",
            )
            .await;

        for heading in [
            "# Dashboard Widget",
            "## Target Users",
            "## Core Features",
            "## Competition",
            "## Acceptance Criteria",
            "## Success Metrics",
        ] {
            assert!(second.reply.contains(heading), "missing {}", heading);
        }
        let criteria = second
            .reply
            .split("## Acceptance Criteria")
            .nth(1)
            .and_then(|rest| rest.split("## Success Metrics").next())
            .unwrap();
        assert!(criteria.matches("\n- ").count() >= 3);

        // The creator saw the whole conversation, including the questions
        let creator_input = &invoker.calls_for("feature_creator")[0];
        assert!(creator_input.starts_with("Conversation History:\n"));
        assert!(creator_input.contains("Q1: Who uses the dashboard?"));
        assert!(creator_input
            .ends_with("Current user message: Ops managers; spotting incidents early; our metrics API"));
        assert_eq!(second.session.feature_turns, 2);
    }

    #[tokio::test]
    async fn test_feature_failure_keeps_clarification_pending() {
        let invoker = Arc::new(ScriptedInvoker::new().fail("feature_clarifier", "overloaded"));

        let turn = assistant(invoker)
            .handle_turn(feature_session(), "Build a dashboard widget")
            .await;

        assert!(turn.reply.starts_with("Error processing feature request: "));
        assert_eq!(turn.session.feature_turns, 0);
        assert_eq!(turn.session.phase, Phase::FeatureDefinition);
    }

    #[tokio::test]
    async fn test_phase_never_reverts() {
        let invoker = Arc::new(
            ScriptedInvoker::new()
                .reply("feature_clarifier", three_questions())
                .reply("feature_creator", definition_reply("Widget"))
                .reply("feature_evaluator", AgentReply::Structured(json!({
                    "decision": "Go ahead",
                    "feedback": []
                }))),
        );
        let assistant = assistant(invoker.clone());

        let mut session = feature_session();
        for message in ["go", "actually, do more research", "research please"] {
            session = assistant.handle_turn(session, message).await.session;
            assert_eq!(session.phase, Phase::FeatureDefinition);
        }
        assert_eq!(invoker.count("research_manager"), 0);
    }
}
