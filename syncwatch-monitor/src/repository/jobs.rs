//! Jobs repository

use async_trait::async_trait;
use std::sync::Arc;
use syncwatch_client::McClient;
use syncwatch_core::domain::job::Job;

use crate::error::SourceError;

/// Source of the job definitions known to the console
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetches all job definitions including their agent assignments
    async fn fetch_jobs(&self) -> Result<Vec<Job>, SourceError>;
}

/// HTTP implementation of JobSource
pub struct HttpJobSource {
    client: Arc<McClient>,
}

impl HttpJobSource {
    pub fn new(client: Arc<McClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl JobSource for HttpJobSource {
    async fn fetch_jobs(&self) -> Result<Vec<Job>, SourceError> {
        Ok(self.client.list_jobs().await?)
    }
}
