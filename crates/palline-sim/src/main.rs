//! Palline headless self-play runner.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod runner;

use config::SimConfig;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SimConfig::from_env()?;
    info!(?config, "Starting Palline self-play...");

    let summary = runner::run(&config)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
