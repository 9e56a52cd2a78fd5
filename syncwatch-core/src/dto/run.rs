//! Run DTOs

use serde::{Deserialize, Serialize};

use crate::domain::job::JobId;

/// Request to start a run of an existing job
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StartRun {
    pub job_id: JobId,
}
