//! Job DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobAgent;

/// Request to create a new job definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub agents: Vec<JobAgent>,
}
