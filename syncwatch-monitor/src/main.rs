//! Syncwatch Monitor daemon
//!
//! Long-running process that watches a Management Console:
//! - reconciles the agent list and logs membership changes
//! - keeps the job/agent index fresh
//! - watches the runs listed in `WATCH_RUNS` until they complete
//!
//! Configuration is read from the environment (see [`Config::from_env`]).
//! The daemon stops on Ctrl-C.

use anyhow::{Context, Result};
use std::sync::Arc;
use syncwatch_client::McClient;
use syncwatch_monitor::config::Config;
use syncwatch_monitor::repository::{HttpAgentSource, HttpJobSource, HttpRunStatusSource};
use syncwatch_monitor::scheduler::{AgentReconciler, JobIndexRefresher, RunMonitor, WatchOutcome};
use syncwatch_monitor::service::{LoggingSink, NotificationSink, PropertyStore};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "syncwatch_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Syncwatch Monitor");

    // Load configuration
    let config = load_config()?;
    info!(
        "Loaded configuration: console={}:{}, agent interval={:?}",
        config.mc_host, config.mc_port, config.agent_poll_interval
    );

    // Initialize console client
    let client = Arc::new(
        McClient::for_host(&config.mc_host, config.mc_port, &config.mc_token)
            .context("Failed to create console client")?,
    );

    let store = Arc::new(PropertyStore::new());
    let sink: Arc<dyn NotificationSink> = Arc::new(LoggingSink);

    // Start recurring tasks
    let reconciler = AgentReconciler::new(
        Arc::new(HttpAgentSource::new(Arc::clone(&client))),
        Arc::clone(&store),
        Arc::clone(&sink),
    )
    .start(config.agent_poll_interval)
    .context("Failed to start agent reconciliation")?;

    let job_index = JobIndexRefresher::new(
        Arc::new(HttpJobSource::new(Arc::clone(&client))),
        Arc::clone(&store),
    )
    .start(config.job_index_interval)
    .context("Failed to start job index refresh")?;

    let runs = RunMonitor::new(
        Arc::new(HttpRunStatusSource::new(Arc::clone(&client))),
        config.run_poll_interval,
    )
    .context("Failed to create run monitor")?;

    for run_id in &config.watch_runs {
        if runs.watch_with_sink(*run_id, Arc::clone(&sink)) == WatchOutcome::AlreadyActive {
            warn!("Run {} listed more than once in WATCH_RUNS", run_id);
        }
    }

    info!("Monitor initialized successfully");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutting down");
    runs.shutdown();
    reconciler.stop();
    job_index.stop();
    reconciler.join().await;
    job_index.join().await;

    Ok(())
}

/// Loads configuration from environment variables
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration from environment")?;
    config.validate()?;
    Ok(config)
}
