use anyhow::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use config::InsightConfig;

fn main() -> Result<()> {
    // Load .env, init tracing on stderr so stdout stays machine-readable
    dotenvy::dotenv().ok();
    let config = InsightConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    }

    tracing::debug!(output = ?config.output, pretty = config.pretty, "Configuration loaded");
    cli::run(config)
}
