//! plansmith - command-line entry point.
//!
//! Reads a plan (a JSON array of steps) from the file named by the first
//! argument, executes it against the default tool registry, and prints the
//! run report as JSON.

use std::sync::Arc;

use plansmith::{config::Config, engine::StepExecutionEngine, plan, tools::ToolRegistry};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plansmith=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let plan_path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Usage: plansmith <plan.json>"))?;

    let config = Config::from_env();
    info!(
        "Loaded configuration: workspace={}",
        config.workspace_path.display()
    );

    let plan_json = tokio::fs::read_to_string(&plan_path).await?;
    let steps = plan::parse_plan(&plan_json)?;
    info!("Loaded plan with {} steps from {}", steps.len(), plan_path);

    let registry = Arc::new(ToolRegistry::new());
    let engine = StepExecutionEngine::new(registry, config.workspace_path);

    let report = engine.run(&steps).await;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
