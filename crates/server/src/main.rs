//! ProdPilot Server
//!
//! Axum server exposing the assistant over HTTP, plus terminal chat and
//! research commands over the same core.

mod api;
mod cli;
mod state;

use anyhow::Context;
use clap::{Parser, Subcommand};
use prodpilot_core::config::{AssistantConfig, CONFIG_PATH};
use prodpilot_core::swarm::Assistant;
use state::{AppState, AssistantFactory};
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

/// Sessions untouched this long are evicted
const SESSION_IDLE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const SESSION_SWEEP_EVERY: Duration = Duration::from_secs(10 * 60);

#[derive(Parser)]
#[command(name = "prodpilot", version, about = "Conversational product-management assistant")]
struct Args {
    /// Config file (created on first PATCH /api/v1/config)
    #[arg(long, global = true, default_value = CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Start the HTTP server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Chat with the assistant in the terminal
    Chat,
    /// Research a product idea and print the report
    Research {
        /// The product idea
        idea: String,
        /// Answer three clarifying questions before researching
        #[arg(long)]
        clarify: bool,
    },
}

/// `RUST_LOG` wins; otherwise info. Logs go to stderr so CLI output stays clean.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub async fn run_server(config: AssistantConfig, config_path: PathBuf, port: u16) -> anyhow::Result<()> {
    let factory: AssistantFactory = Arc::new(Assistant::from_config);
    let state = Arc::new(AppState::new(config, config_path, factory)?);
    state::spawn_session_sweeper(state.clone(), SESSION_IDLE_TTL, SESSION_SWEEP_EVERY);

    let app = api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("ProdPilot listening on http://{}", addr);
    tracing::info!("OpenAPI spec at http://{}/api/v1/openapi.json", addr);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let args = Args::parse();
    let config = AssistantConfig::load(&args.config).await;
    tracing::debug!("Loaded config from {}", args.config.display());

    match args.command.unwrap_or(CliCommand::Serve { port: 8080 }) {
        CliCommand::Serve { port } => run_server(config, args.config, port).await,
        CliCommand::Chat => cli::run_chat(Assistant::from_config(&config)?).await,
        CliCommand::Research { idea, clarify } => {
            cli::run_research(Assistant::from_config(&config)?, idea, clarify).await
        }
    }
}
