//! # Research Flow
//!
//! Plan -> concurrent search -> technical & business synthesis -> report -> email.
//!
//! [`ResearchPipeline::run`] returns a lazy, one-shot stream: nothing happens
//! until it is polled, each stage runs when the previous notice is consumed,
//! and the last item is always the report (or the error that ended the run).

use crate::config::AssistantConfig;
use crate::errors::{AssistantError, Result};
use crate::skills::agent_definitions;
use crate::skills::invoker::{AgentInvoker, AgentSpec};
use crate::skills::tools::{AgentSearch, AgentTool, Mailer, SearchTool, SendGridMailer, WebSearchTool};
use crate::state::{Report, SearchPlan};
use crate::swarm::events::ResearchEvent;
use async_trait::async_trait;
use futures::stream::{self, BoxStream, FuturesUnordered};
use futures::StreamExt;
use std::sync::Arc;

pub const TECHNICAL_PLACEHOLDER: &str = "Technical feasibility analysis completed. Implementation complexity: Medium. Estimated timeline: 3-4 months with 2-3 developers.";
pub const BUSINESS_PLACEHOLDER: &str = "Business impact analysis completed. Market opportunity: High. Expected ROI: 250% within 12 months.";

/// Produces an assessment from the research query and the search findings
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn assess(&self, query: &str, results: &[String]) -> Result<String>;
}

/// Fixed assessment text, no model call
pub struct PlaceholderSynthesizer {
    assessment: &'static str,
}

impl PlaceholderSynthesizer {
    pub fn technical() -> Self {
        Self {
            assessment: TECHNICAL_PLACEHOLDER,
        }
    }

    pub fn business() -> Self {
        Self {
            assessment: BUSINESS_PLACEHOLDER,
        }
    }
}

#[async_trait]
impl Synthesizer for PlaceholderSynthesizer {
    async fn assess(&self, _query: &str, _results: &[String]) -> Result<String> {
        Ok(self.assessment.to_string())
    }
}

/// Assessment written by an analyst agent
pub struct AgentSynthesizer {
    invoker: Arc<dyn AgentInvoker>,
    agent: AgentSpec,
}

impl AgentSynthesizer {
    pub fn technical(invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            invoker,
            agent: agent_definitions::technical_analyst_agent(),
        }
    }

    pub fn business(invoker: Arc<dyn AgentInvoker>) -> Self {
        Self {
            invoker,
            agent: agent_definitions::business_analyst_agent(),
        }
    }
}

#[async_trait]
impl Synthesizer for AgentSynthesizer {
    async fn assess(&self, query: &str, results: &[String]) -> Result<String> {
        let input = format!(
            "Feature idea: {}\n\nResearch results:\n{}",
            query,
            numbered(results)
        );
        self.invoker.text(&self.agent, input, None).await
    }
}

fn numbered(results: &[String]) -> String {
    if results.is_empty() {
        return "(no search results available)".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{}. {}", i + 1, r.trim()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Clone)]
pub struct ResearchPipeline {
    invoker: Arc<dyn AgentInvoker>,
    search: Arc<dyn SearchTool>,
    technical: Arc<dyn Synthesizer>,
    business: Arc<dyn Synthesizer>,
    mailer: Option<Arc<dyn Mailer>>,
    max_searches: usize,
}

impl ResearchPipeline {
    /// Placeholder assessments, no email, default search bound
    pub fn new(invoker: Arc<dyn AgentInvoker>, search: Arc<dyn SearchTool>) -> Self {
        Self {
            invoker,
            search,
            technical: Arc::new(PlaceholderSynthesizer::technical()),
            business: Arc::new(PlaceholderSynthesizer::business()),
            mailer: None,
            max_searches: AssistantConfig::default().max_searches,
        }
    }

    /// Production wiring: agent-backed web search, SendGrid when configured,
    /// live synthesis when enabled
    pub fn from_config(
        invoker: Arc<dyn AgentInvoker>,
        config: &AssistantConfig,
    ) -> anyhow::Result<Self> {
        let web: Arc<dyn AgentTool> = Arc::new(WebSearchTool::new(config.searxng_url.as_deref())?);
        let search = Arc::new(AgentSearch::new(invoker.clone(), web));

        let mut pipeline =
            Self::new(invoker.clone(), search).with_max_searches(config.max_searches);

        if config.live_synthesis {
            pipeline = pipeline.with_synthesizers(
                Arc::new(AgentSynthesizer::technical(invoker.clone())),
                Arc::new(AgentSynthesizer::business(invoker)),
            );
        }

        match SendGridMailer::from_env() {
            Some(mailer) => pipeline = pipeline.with_mailer(Arc::new(mailer)),
            None => tracing::info!("Email delivery not configured, reports will not be sent"),
        }

        Ok(pipeline)
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn with_synthesizers(
        mut self,
        technical: Arc<dyn Synthesizer>,
        business: Arc<dyn Synthesizer>,
    ) -> Self {
        self.technical = technical;
        self.business = business;
        self
    }

    pub fn with_max_searches(mut self, max_searches: usize) -> Self {
        self.max_searches = max_searches.max(1);
        self
    }

    /// Research `idea`, using `clarified` as the query when given
    pub fn run(&self, idea: &str, clarified: Option<&str>) -> BoxStream<'static, Result<ResearchEvent>> {
        let query = clarified
            .filter(|q| !q.trim().is_empty())
            .unwrap_or(idea)
            .to_string();

        let run = ResearchRun {
            pipeline: self.clone(),
            idea: idea.to_string(),
            query,
        };

        stream::unfold(Some((run, Stage::Start)), |state| async move {
            let (run, stage) = state?;
            match run.step(stage).await {
                Ok((event, Stage::Done)) => Some((Ok(event), None)),
                Ok((event, next)) => Some((Ok(event), Some((run, next)))),
                Err(e) => {
                    tracing::warn!("Research run failed: {}", e);
                    Some((Err(e), None))
                }
            }
        })
        .boxed()
    }

    /// Drive the stream to completion and return the report
    pub async fn report(&self, idea: &str, clarified: Option<&str>) -> Result<Report> {
        let mut events = self.run(idea, clarified);
        while let Some(event) = events.next().await {
            match event? {
                ResearchEvent::Progress(notice) => tracing::debug!("{}", notice),
                ResearchEvent::Report(report) => return Ok(report),
            }
        }
        Err(AssistantError::Tool {
            tool: "research".to_string(),
            reason: "stream ended without a report".to_string(),
        })
    }

    async fn plan(&self, query: &str) -> Result<SearchPlan> {
        let input = format!(
            "Product feature analysis query: {}. Focus on market research, competitive analysis, \
             user research, and technical feasibility.",
            query
        );
        let plan: SearchPlan = self
            .invoker
            .structured(&agent_definitions::planner_agent(), input)
            .await?;

        let planned = plan.searches.len();
        let plan = plan.bounded(self.max_searches);
        if plan.searches.len() < planned {
            tracing::debug!("Search plan trimmed from {} to {}", planned, plan.searches.len());
        }
        Ok(plan)
    }

    /// Fan out one search per planned item; failed or empty searches are dropped
    async fn perform_searches(&self, plan: &SearchPlan) -> Vec<String> {
        let mut pending: FuturesUnordered<_> = plan
            .searches
            .iter()
            .cloned()
            .map(|item| {
                let search = Arc::clone(&self.search);
                async move {
                    match search.search(&item.query, &item.reason).await {
                        Ok(text) if !text.trim().is_empty() => Some(text),
                        Ok(_) => {
                            tracing::debug!("Search '{}' returned nothing usable", item.query);
                            None
                        }
                        Err(e) => {
                            tracing::warn!("Search '{}' failed: {:#}", item.query, e);
                            None
                        }
                    }
                }
            })
            .collect();

        let total = pending.len();
        let mut completed = 0;
        let mut results = Vec::with_capacity(total);
        while let Some(result) = pending.next().await {
            completed += 1;
            tracing::debug!("Searching... {}/{} completed", completed, total);
            results.extend(result);
        }
        results
    }

    async fn write_report(
        &self,
        idea: &str,
        query: &str,
        findings: &Findings,
    ) -> Result<Report> {
        let mut input = format!("Product feature analysis report for: {}\n", idea);
        if query != idea {
            input.push_str(&format!("Clarified research query: {}\n", query));
        }
        input.push_str(&format!(
            "\nMarket research results:\n{}\n\nTechnical analysis: {}\n\nBusiness analysis: {}",
            numbered(&findings.results),
            findings.technical,
            findings.business
        ));

        self.invoker
            .structured(&agent_definitions::writer_agent(), input)
            .await
    }

    /// Best effort: failures are logged and swallowed
    async fn send_report(&self, mailer: &dyn Mailer, report: &Report) {
        if let Err(e) = mailer
            .send(&report.email_subject(), &report.markdown_report)
            .await
        {
            tracing::warn!("Failed to email report: {:#}", e);
        }
    }
}

#[derive(Debug, Default)]
struct Findings {
    results: Vec<String>,
    technical: String,
    business: String,
}

/// Next step of a run; each step emits exactly one event
enum Stage {
    Start,
    Plan,
    Search(SearchPlan),
    Technical(Findings),
    Business(Findings),
    Write(Findings),
    Email(Report),
    Deliver(Report),
    Done,
}

struct ResearchRun {
    pipeline: ResearchPipeline,
    idea: String,
    query: String,
}

impl ResearchRun {
    async fn step(&self, stage: Stage) -> Result<(ResearchEvent, Stage)> {
        let pipeline = &self.pipeline;
        let next = match stage {
            Stage::Start => {
                tracing::info!("Starting product analysis: {}", self.query);
                (
                    ResearchEvent::progress("🔍 Planning market and competitive research..."),
                    Stage::Plan,
                )
            }
            Stage::Plan => {
                let plan = pipeline.plan(&self.query).await?;
                (
                    ResearchEvent::progress(format!(
                        "🌐 Running {} searches...",
                        plan.searches.len()
                    )),
                    Stage::Search(plan),
                )
            }
            Stage::Search(plan) => {
                let results = pipeline.perform_searches(&plan).await;
                tracing::info!(
                    "{} of {} searches returned results",
                    results.len(),
                    plan.searches.len()
                );
                (
                    ResearchEvent::progress("⚙️ Analyzing technical feasibility..."),
                    Stage::Technical(Findings {
                        results,
                        ..Default::default()
                    }),
                )
            }
            Stage::Technical(mut findings) => {
                findings.technical = pipeline
                    .technical
                    .assess(&self.query, &findings.results)
                    .await?;
                (
                    ResearchEvent::progress("📊 Evaluating business impact..."),
                    Stage::Business(findings),
                )
            }
            Stage::Business(mut findings) => {
                findings.business = pipeline
                    .business
                    .assess(&self.query, &findings.results)
                    .await?;
                (
                    ResearchEvent::progress("📝 Writing product analysis report..."),
                    Stage::Write(findings),
                )
            }
            Stage::Write(findings) => {
                let report = pipeline
                    .write_report(&self.idea, &self.query, &findings)
                    .await?;
                if pipeline.mailer.is_some() {
                    (
                        ResearchEvent::progress("📧 Sending analysis report..."),
                        Stage::Email(report),
                    )
                } else {
                    (
                        ResearchEvent::progress("✅ Product analysis complete!"),
                        Stage::Deliver(report),
                    )
                }
            }
            Stage::Email(report) => {
                if let Some(mailer) = &pipeline.mailer {
                    pipeline.send_report(mailer.as_ref(), &report).await;
                }
                (
                    ResearchEvent::progress("✅ Product analysis complete!"),
                    Stage::Deliver(report),
                )
            }
            Stage::Deliver(report) => (ResearchEvent::Report(report), Stage::Done),
            Stage::Done => {
                return Err(AssistantError::Tool {
                    tool: "research".to_string(),
                    reason: "run already finished".to_string(),
                })
            }
        };
        Ok(next)
    }
}
