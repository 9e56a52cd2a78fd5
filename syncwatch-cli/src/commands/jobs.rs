//! Job command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use syncwatch_core::domain::agent::AgentId;
use syncwatch_core::domain::job::{Job, JobAgent, JobId};
use syncwatch_core::dto::job::CreateJob;

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List all job definitions
    List,
    /// Show a job definition
    Show {
        /// Job id
        id: u64,
    },
    /// Create a job syncing one folder path across agents
    Create {
        /// Job name
        #[arg(short, long)]
        name: String,

        /// Job type
        #[arg(short = 't', long = "type", default_value = "sync")]
        job_type: String,

        /// Job description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Participating agent id (repeatable)
        #[arg(short, long = "agent", required = true)]
        agents: Vec<u64>,

        /// Folder path used on every platform
        #[arg(short, long)]
        path: String,

        /// Agent permission
        #[arg(long, default_value = "rw")]
        permission: String,
    },
    /// Delete a job definition
    Delete {
        /// Job id
        id: u64,
    },
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        JobCommands::List => {
            let jobs = client.list_jobs().await?;
            if jobs.is_empty() {
                println!("{}", "No jobs found.".yellow());
            } else {
                println!("{}", format!("Found {} job(s):", jobs.len()).bold());
                println!();
                for job in &jobs {
                    print_job_summary(job);
                }
            }
            Ok(())
        }
        JobCommands::Show { id } => {
            let job = client.get_job(JobId(id)).await?;
            print_job_details(&job);
            Ok(())
        }
        JobCommands::Create {
            name,
            job_type,
            description,
            agents,
            path,
            permission,
        } => {
            let req = CreateJob {
                name,
                description,
                job_type,
                agents: agents
                    .into_iter()
                    .map(|id| JobAgent::new(AgentId(id), permission.as_str(), path.as_str()))
                    .collect(),
            };
            let job_id = client.create_job(&req).await?;
            println!("{} Created job {} ({})", "✓".green(), job_id, req.name);
            Ok(())
        }
        JobCommands::Delete { id } => {
            client.delete_job(JobId(id)).await?;
            println!("{} Deleted job {}", "✓".green(), id);
            Ok(())
        }
    }
}

fn print_job_summary(job: &Job) {
    println!("  {} Job {} {}", "▸".cyan(), job.id.to_string().bold(), job.name);
    println!("    Type:   {}", job.job_type);
    let agents: Vec<String> = job.agent_ids().iter().map(|id| id.to_string()).collect();
    println!("    Agents: {}", agents.join(", ").dimmed());
    if let Some(description) = job.description.as_deref().filter(|d| !d.is_empty()) {
        println!("    {}", description.dimmed());
    }
    println!();
}

fn print_job_details(job: &Job) {
    println!("Job {} {}", job.id.to_string().bold(), job.name);
    println!("  Type: {}", job.job_type);
    if let Some(description) = job.description.as_deref().filter(|d| !d.is_empty()) {
        println!("  Description: {}", description);
    }
    for agent in &job.agents {
        let path = agent
            .path
            .linux
            .as_deref()
            .or(agent.path.win.as_deref())
            .or(agent.path.osx.as_deref())
            .unwrap_or("-");
        println!(
            "  {} Agent {} [{}] {}",
            "▸".cyan(),
            agent.id.to_string().bold(),
            agent.permission,
            path.dimmed()
        );
    }
}
