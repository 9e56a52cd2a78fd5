//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod agents;
mod jobs;
mod runs;

pub use agents::AgentCommands;
pub use jobs::JobCommands;
pub use runs::RunCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Agent inspection and membership watching
    Agents {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Job definitions
    Jobs {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Job runs
    Runs {
        #[command(subcommand)]
        command: RunCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Agents { command } => agents::handle_agent_command(command, config).await,
        Commands::Jobs { command } => jobs::handle_job_command(command, config).await,
        Commands::Runs { command } => runs::handle_run_command(command, config).await,
    }
}
