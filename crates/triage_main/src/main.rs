use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use triage_app::{Orchestrator, ToolRegistry, initial_state};
use triage_config::TriageConfig;
use triage_provider::Anthropic;

mod report;

use report::Report;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the report
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "triage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = TriageConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        ticket = %config.ticket_number,
        model = %config.model,
        "Starting execution"
    );

    let oracle = Anthropic::from_config(&config)?;
    let orchestrator = Orchestrator::new(oracle, Arc::new(ToolRegistry::triage()))?
        .max_iterations(config.max_iterations);

    let state = orchestrator
        .run(initial_state(&config.ticket_number))
        .await
        .with_context(|| format!("Triage of ticket {} failed", config.ticket_number))?;

    print!("{}", Report::from(&state));
    Ok(())
}
