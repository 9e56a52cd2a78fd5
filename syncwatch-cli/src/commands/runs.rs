//! Run command handlers
//!
//! Starts runs, shows their status, and blocks until a run completes using
//! the run monitor.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use std::sync::Arc;
use syncwatch_client::McClient;
use syncwatch_core::domain::job::JobId;
use syncwatch_core::domain::run::{RunCompletion, RunId, RunOutcome};
use syncwatch_monitor::repository::HttpRunStatusSource;
use syncwatch_monitor::scheduler::RunMonitor;

use crate::config::Config;

/// Run subcommands
#[derive(Subcommand)]
pub enum RunCommands {
    /// Start a run of a job
    Start {
        /// Job id
        job_id: u64,

        /// Wait for the run to complete
        #[arg(short, long)]
        watch: bool,
    },
    /// Show the current status of a run
    Status {
        /// Run id
        run_id: u64,
    },
    /// Stop a running job run
    Stop {
        /// Run id
        run_id: u64,
    },
    /// Wait until a run finishes or disappears
    Watch {
        /// Run id
        run_id: u64,
    },
    /// List the runs of a job
    List {
        /// Job id
        job_id: u64,
    },
}

/// Handle run commands
pub async fn handle_run_command(command: RunCommands, config: &Config) -> Result<()> {
    let client = Arc::new(config.client()?);

    match command {
        RunCommands::Start { job_id, watch } => {
            let run_id = client.start_run(JobId(job_id)).await?;
            println!("{} Started run {} of job {}", "✓".green(), run_id, job_id);
            if watch {
                watch_run(client, config, run_id).await?;
            }
            Ok(())
        }
        RunCommands::Status { run_id } => show_status(&client, RunId(run_id)).await,
        RunCommands::Stop { run_id } => {
            client.stop_run(RunId(run_id)).await?;
            println!("{} Stopped run {}", "✓".green(), run_id);
            Ok(())
        }
        RunCommands::Watch { run_id } => watch_run(client, config, RunId(run_id)).await,
        RunCommands::List { job_id } => {
            let runs = client.list_runs_for_job(JobId(job_id)).await?;
            if runs.is_empty() {
                println!("{}", "No runs found.".yellow());
            }
            for run in runs {
                println!("  {} Run {}: {}", "▸".cyan(), run.id.to_string().bold(), run.report.status);
            }
            Ok(())
        }
    }
}

async fn show_status(client: &McClient, run_id: RunId) -> Result<()> {
    match client.get_run(run_id).await {
        Ok(report) => {
            println!("Run {}", run_id.to_string().bold());
            println!("  Status: {}", report.status);
            if let Some(job_id) = report.job_id {
                println!("  Job:    {}", job_id);
            }
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            println!("{}", format!("Run {} not found", run_id).yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn watch_run(client: Arc<McClient>, config: &Config, run_id: RunId) -> Result<()> {
    let monitor = RunMonitor::new(
        Arc::new(HttpRunStatusSource::new(client)),
        config.poll_interval,
    )?;

    let completion = monitor
        .watch_channel(run_id)
        .context("Run is already being watched")?;

    println!(
        "{}",
        format!("Watching run {} every {:?}...", run_id, config.poll_interval).dimmed()
    );

    tokio::select! {
        result = completion => {
            let completion = result.context("Run monitor stopped unexpectedly")?;
            print_completion(&completion);
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            monitor.shutdown();
            println!("{}", "Stopped watching".yellow());
        }
    }

    Ok(())
}

fn print_completion(completion: &RunCompletion) {
    let job = completion
        .job_id
        .map(|id| format!(" of job {}", id))
        .unwrap_or_default();

    match completion.outcome {
        RunOutcome::Finished => println!(
            "{} Run {}{} finished after {} poll(s)",
            "✓".green(),
            completion.run_id,
            job,
            completion.polls
        ),
        RunOutcome::NotFound => println!(
            "{} Run {}{} not found after {} poll(s)",
            "✗".red(),
            completion.run_id,
            job,
            completion.polls
        ),
    }
}
