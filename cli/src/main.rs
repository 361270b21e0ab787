//! Smart Entry operator shell binary
//!
//! Logs an operator in against the configured Smart Entry API and drives
//! the desk workflows (search/assign, entry marking, reporting) from an
//! interactive terminal.

mod commands;
mod config;
mod render;
mod shell;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smart_entry=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    tracing::debug!(api_url = %config.api_url, "Loaded configuration");

    shell::run(config).await
}
