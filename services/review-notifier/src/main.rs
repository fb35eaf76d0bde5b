//! Review notifier CLI
//!
//! Command-line interface for the homework review status notifier.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use review_notifier::{load_config, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "review-notifier")]
#[command(about = "Homework review status notifier for Telegram")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Time between polls, e.g. "10m" (overrides config file)
    #[arg(long, value_parser = humantime::parse_duration)]
    retry_period: Option<Duration>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: config={:?}, retry_period={:?}, log_level={:?}",
        args.config,
        args.retry_period,
        args.log_level
    );

    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {:?}", path);
    }

    let mut config = if let Some(config_path) = &args.config {
        tracing::debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        tracing::debug!("Using default configuration");
        Config::default()
    };

    if let Err(e) = config.resolve_secrets() {
        tracing::error!("{}", e);
        return Err(e.into());
    }

    if let Some(retry_period) = args.retry_period {
        config.polling.retry_period = retry_period;
    }

    tracing::info!("Starting review notifier");
    review_notifier::run(config).await?;

    Ok(())
}
