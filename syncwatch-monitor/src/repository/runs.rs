//! Runs repository
//!
//! Fetches the status of a single job run. A 404 from the console is not an
//! error here: it is the "not found" terminal condition of the run monitor.

use async_trait::async_trait;
use std::sync::Arc;
use syncwatch_client::McClient;
use syncwatch_core::domain::run::{RunId, RunStatusReport};
use tracing::debug;

use crate::error::SourceError;

/// Source of job run status
#[async_trait]
pub trait RunStatusSource: Send + Sync {
    /// Fetches the current status of a run
    ///
    /// # Arguments
    /// * `run_id` - The run to query
    async fn fetch_run_status(&self, run_id: RunId) -> Result<RunStatusReport, SourceError>;
}

/// HTTP implementation of RunStatusSource
pub struct HttpRunStatusSource {
    client: Arc<McClient>,
}

impl HttpRunStatusSource {
    pub fn new(client: Arc<McClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RunStatusSource for HttpRunStatusSource {
    async fn fetch_run_status(&self, run_id: RunId) -> Result<RunStatusReport, SourceError> {
        match self.client.get_run(run_id).await {
            Ok(report) => Ok(report),
            Err(e) if e.is_not_found() => {
                debug!("Run {} not found on the console", run_id);
                Ok(RunStatusReport::not_found())
            }
            Err(e) => Err(e.into()),
        }
    }
}
