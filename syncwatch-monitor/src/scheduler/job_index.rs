//! Job index refresh
//!
//! Keeps the `agents` property of every job in the property store in line
//! with the console, so callers can look up which agents a job spans.

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{EngineError, SourceError};
use crate::repository::JobSource;
use crate::scheduler::schedule::{Schedule, TaskHandle};
use crate::service::{JOB_AGENTS, PropertyStore};

/// Periodically records the agent assignment of each job
pub struct JobIndexRefresher {
    source: Arc<dyn JobSource>,
    store: Arc<PropertyStore>,
}

impl JobIndexRefresher {
    pub fn new(source: Arc<dyn JobSource>, store: Arc<PropertyStore>) -> Self {
        Self { source, store }
    }

    /// Fetches all jobs once and updates the store
    ///
    /// # Returns
    /// The number of jobs indexed
    pub async fn refresh(&self) -> Result<usize, SourceError> {
        let jobs = self.source.fetch_jobs().await?;

        for job in &jobs {
            let agents: Vec<Value> = job.agents.iter().map(|a| Value::from(a.id.0)).collect();
            self.store.set_job_property(job.id, JOB_AGENTS, agents);
        }

        debug!("Indexed agents of {} job(s)", jobs.len());
        Ok(jobs.len())
    }

    /// Starts refreshing on its own task, first refresh immediately
    pub fn start(self, interval: Duration) -> Result<TaskHandle, EngineError> {
        let cancel = CancellationToken::new();
        let schedule = Schedule::new(interval, cancel.clone())?;

        info!("Starting job index refresh (interval: {:?})", interval);
        Ok(TaskHandle::spawn("job-index", cancel, async move {
            loop {
                if let Err(e) = self.refresh().await {
                    warn!("Failed to refresh job index: {}", e);
                }
                if !schedule.wait().await {
                    break;
                }
            }
        }))
    }
}
