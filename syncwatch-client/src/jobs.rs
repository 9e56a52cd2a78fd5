//! Job-related API endpoints

use crate::McClient;
use crate::error::Result;
use syncwatch_core::domain::job::{Job, JobId};
use syncwatch_core::dto::Created;
use syncwatch_core::dto::job::CreateJob;

impl McClient {
    // =============================================================================
    // Job Definitions
    // =============================================================================

    /// List all job definitions
    pub async fn list_jobs(&self) -> Result<Vec<Job>> {
        let response = self.client.get(self.url("/jobs")).send().await?;

        self.handle_response(response).await
    }

    /// Get a job definition by id
    pub async fn get_job(&self, job_id: JobId) -> Result<Job> {
        let url = self.url(&format!("/jobs/{}", job_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Create a new job definition
    ///
    /// # Arguments
    /// * `req` - Name, description, type and participating agents
    ///
    /// # Returns
    /// The id assigned by the console
    ///
    /// # Example
    /// ```no_run
    /// # use syncwatch_client::McClient;
    /// # use syncwatch_core::domain::{agent::AgentId, job::JobAgent};
    /// # use syncwatch_core::dto::job::CreateJob;
    /// # async fn example(client: McClient) -> syncwatch_client::Result<()> {
    /// let job_id = client.create_job(&CreateJob {
    ///     name: "backup".to_string(),
    ///     description: "nightly backup".to_string(),
    ///     job_type: "sync".to_string(),
    ///     agents: vec![JobAgent::new(AgentId(1), "rw", "/srv/backup")],
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_job(&self, req: &CreateJob) -> Result<JobId> {
        let response = self.client.post(self.url("/jobs")).json(req).send().await?;

        let created: Created = self.handle_response(response).await?;
        Ok(JobId(created.id))
    }

    /// Delete a job definition
    pub async fn delete_job(&self, job_id: JobId) -> Result<()> {
        let url = self.url(&format!("/jobs/{}", job_id));
        let response = self.client.delete(&url).send().await?;

        self.handle_empty_response(response).await
    }
}
