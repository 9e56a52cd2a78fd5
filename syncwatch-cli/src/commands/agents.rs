//! Agent command handlers
//!
//! Lists agents and runs the reconciliation loop in the foreground,
//! printing membership changes as they are detected.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use std::sync::Arc;
use syncwatch_core::domain::agent::{Agent, AgentId};
use syncwatch_core::domain::run::RunCompletion;
use syncwatch_core::snapshot::AgentSet;
use syncwatch_monitor::repository::HttpAgentSource;
use syncwatch_monitor::scheduler::AgentReconciler;
use syncwatch_monitor::service::{NotificationSink, PropertyStore};

use crate::config::Config;

/// Agent subcommands
#[derive(Subcommand)]
pub enum AgentCommands {
    /// List all agents
    List,
    /// Show a single agent
    Show {
        /// Agent id
        id: u64,
    },
    /// Print agent membership changes until interrupted
    Watch,
}

/// Handle agent commands
pub async fn handle_agent_command(command: AgentCommands, config: &Config) -> Result<()> {
    let client = Arc::new(config.client()?);

    match command {
        AgentCommands::List => list_agents(&client).await,
        AgentCommands::Show { id } => {
            let agent = client.get_agent(AgentId(id)).await?;
            print_agent(&agent);
            Ok(())
        }
        AgentCommands::Watch => watch_agents(client, config).await,
    }
}

/// List all agents
async fn list_agents(client: &syncwatch_client::McClient) -> Result<()> {
    let mut agents = client.list_agents().await?;

    if agents.is_empty() {
        println!("{}", "No agents registered.".yellow());
        return Ok(());
    }

    agents.sort_by_key(|a| a.id);
    println!("{}", format!("Found {} agent(s):", agents.len()).bold());
    println!();
    for agent in &agents {
        print_agent(agent);
    }

    Ok(())
}

async fn watch_agents(client: Arc<syncwatch_client::McClient>, config: &Config) -> Result<()> {
    let reconciler = AgentReconciler::new(
        Arc::new(HttpAgentSource::new(client)),
        Arc::new(PropertyStore::new()),
        Arc::new(PrintSink),
    );

    let handle = reconciler.start(config.poll_interval)?;
    println!(
        "{}",
        format!(
            "Watching agents every {:?} (Ctrl-C to stop)",
            config.poll_interval
        )
        .bold()
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    handle.stop();
    handle.join().await;
    Ok(())
}

fn print_agent(agent: &Agent) {
    let status = if agent.online {
        agent.status_label().green()
    } else {
        agent.status_label().red()
    };

    println!("  {} Agent {} {}", "▸".cyan(), agent.id.to_string().bold(), agent.name);
    println!("    Status: {}", status);
}

/// Sink printing agent events to stdout
struct PrintSink;

impl NotificationSink for PrintSink {
    fn on_agents_changed(&self, delta: &AgentSet) {
        let mut ids: Vec<_> = delta.iter().map(|id| id.to_string()).collect();
        ids.sort();
        println!("{} {}", "Agents changed:".yellow().bold(), ids.join(", "));
    }

    fn on_agents_unchanged(&self) {
        println!("{}", "No agent changes".dimmed());
    }

    fn on_job_finished(&self, _completion: &RunCompletion) {}
}
