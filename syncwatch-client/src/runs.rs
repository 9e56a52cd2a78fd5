//! Run-related API endpoints

use crate::McClient;
use crate::error::Result;
use serde::Deserialize;
use syncwatch_core::domain::job::JobId;
use syncwatch_core::domain::run::{RunId, RunStatusReport};
use syncwatch_core::dto::Created;
use syncwatch_core::dto::run::StartRun;

/// Entry of `GET /runs?job_id=`
#[derive(Debug, Clone, Deserialize)]
pub struct RunSummary {
    pub id: RunId,
    #[serde(flatten)]
    pub report: RunStatusReport,
}

impl McClient {
    // =============================================================================
    // Run Lifecycle
    // =============================================================================

    /// Start a new run of a job
    ///
    /// # Returns
    /// The id of the created run
    pub async fn start_run(&self, job_id: JobId) -> Result<RunId> {
        let response = self
            .client
            .post(self.url("/runs"))
            .json(&StartRun { job_id })
            .send()
            .await?;

        let created: Created = self.handle_response(response).await?;
        Ok(RunId(created.id))
    }

    /// Get the current status of a run
    ///
    /// A run the console does not know yields an `ApiError` with status 404.
    pub async fn get_run(&self, run_id: RunId) -> Result<RunStatusReport> {
        let url = self.url(&format!("/runs/{}", run_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List the runs of a job
    pub async fn list_runs_for_job(&self, job_id: JobId) -> Result<Vec<RunSummary>> {
        let response = self
            .client
            .get(self.url("/runs"))
            .query(&[("job_id", job_id.0)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Stop an active run
    pub async fn stop_run(&self, run_id: RunId) -> Result<()> {
        let url = self.url(&format!("/runs/{}/stop", run_id));
        let response = self.client.put(&url).send().await?;

        self.handle_empty_response(response).await
    }
}
