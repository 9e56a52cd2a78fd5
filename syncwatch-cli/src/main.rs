//! Syncwatch CLI
//!
//! Command-line interface for inspecting a Management Console and watching
//! its agents and job runs.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "syncwatch")]
#[command(about = "Management Console agent and job run watcher", long_about = None)]
struct Cli {
    /// Management Console host name
    #[arg(long, env = "SYNCWATCH_HOST")]
    host: String,

    /// Management Console API port
    #[arg(long, env = "SYNCWATCH_PORT", default_value_t = 8443)]
    port: u16,

    /// API token
    #[arg(long, env = "SYNCWATCH_TOKEN", hide_env_values = true)]
    token: String,

    /// Polling interval in seconds for watch commands
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "syncwatch_cli=warn,syncwatch_monitor=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        host: cli.host,
        port: cli.port,
        token: cli.token,
        poll_interval: Duration::from_secs(cli.poll_interval),
    };

    handle_command(cli.command, &config).await
}
