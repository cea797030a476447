// Journey Webhook Bridge - Main Entry Point
//
// Hosts the custom-activity HTTP surface Journey Builder calls into and
// relays contact executions to the configured webhook.

use anyhow::Result;
use clap::Parser;
use journey_webhook_bridge::config::Config;
use journey_webhook_bridge::server;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Journey Builder custom-activity webhook bridge
#[derive(Parser, Debug)]
#[command(name = "journey-webhook-bridge")]
#[command(version = "0.1.0")]
#[command(about = "Relays Journey Builder contact executions to a configured webhook", long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Listening port (overrides config file and PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::from_env()?,
    };
    if let Some(port) = args.port {
        config.port = port;
    }

    let filter = if args.verbose {
        Level::DEBUG
    } else {
        config.log_level()?
    };
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(filter.into())
                .from_env_lossy(),
        )
        .init();

    info!("Journey Webhook Bridge v0.1.0 starting...");
    info!(
        "Outbound webhook timeout: {}s",
        config.webhook_timeout_secs
    );

    server::serve(&config).await
}
