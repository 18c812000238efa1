//! Lendwise scenario replay
//!
//! Usage: `lendwise <scenario.json> [config.toml]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lendwise_common::VERSION;
use lendwise_market::{LendwiseConfig, Scenario, ScenarioRunner};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let scenario_path = args
        .next()
        .map(PathBuf::from)
        .context("usage: lendwise <scenario.json> [config.toml]")?;
    let config_path = args.next().map(PathBuf::from);

    info!("Starting Lendwise scenario replay v{}", VERSION);

    let config = LendwiseConfig::load(config_path.as_deref())?;
    info!("Loaded configuration: {:?}", config);

    let raw = std::fs::read_to_string(&scenario_path)
        .with_context(|| format!("Failed to read scenario {}", scenario_path.display()))?;
    let scenario: Scenario = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse scenario {}", scenario_path.display()))?;

    let report = ScenarioRunner::new(&config)?.run(&scenario).await?;
    info!(
        steps = report.steps.len(),
        failed = report.failed_steps(),
        events = report.events.len(),
        "Scenario complete"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
