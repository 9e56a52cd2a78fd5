//! Job run domain types
//!
//! A run is one execution of a job definition. The monitor only needs the
//! run's status and the job it belongs to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::job::JobId;

/// Status code the console uses for a run that does not exist
pub const NOT_FOUND_CODE: u16 = 404;

/// Identifier of a single job run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RunId {
    fn from(id: u64) -> Self {
        RunId(id)
    }
}

/// Run status as reported by the console
///
/// Unknown values are kept verbatim in `Other` so they can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunState {
    Pending,
    Running,
    Finished,
    NotFound,
    Other(String),
}

impl From<String> for RunState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => RunState::Pending,
            "running" => RunState::Running,
            "finished" => RunState::Finished,
            "not_found" | "not-found" => RunState::NotFound,
            _ => RunState::Other(raw),
        }
    }
}

impl From<RunState> for String {
    fn from(state: RunState) -> Self {
        match state {
            RunState::Pending => "pending".to_string(),
            RunState::Running => "running".to_string(),
            RunState::Finished => "finished".to_string(),
            RunState::NotFound => "not_found".to_string(),
            RunState::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Pending => write!(f, "pending"),
            RunState::Running => write!(f, "running"),
            RunState::Finished => write!(f, "finished"),
            RunState::NotFound => write!(f, "not_found"),
            RunState::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// The fields of `GET /runs/{id}` the monitor evaluates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatusReport {
    /// Job definition the run belongs to (absent when the run is unknown)
    #[serde(default)]
    pub job_id: Option<JobId>,

    pub status: RunState,

    /// Numeric status or error code attached to the response
    #[serde(default)]
    pub code: Option<u16>,
}

impl RunStatusReport {
    pub fn new(job_id: JobId, status: RunState) -> Self {
        Self {
            job_id: Some(job_id),
            status,
            code: None,
        }
    }

    /// Report synthesized for a run the console answered 404 for
    pub fn not_found() -> Self {
        Self {
            job_id: None,
            status: RunState::NotFound,
            code: Some(NOT_FOUND_CODE),
        }
    }

    /// Terminal outcome carried by this report, if any
    pub fn outcome(&self) -> Option<RunOutcome> {
        if self.status == RunState::Finished {
            Some(RunOutcome::Finished)
        } else if self.status == RunState::NotFound || self.code == Some(NOT_FOUND_CODE) {
            Some(RunOutcome::NotFound)
        } else {
            None
        }
    }
}

/// How a monitored run left the active state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// The console reported the run as finished
    Finished,

    /// The console no longer knows the run
    NotFound,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunOutcome::Finished => write!(f, "finished"),
            RunOutcome::NotFound => write!(f, "not found"),
        }
    }
}

/// Delivered once to the completion handler of a monitored run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCompletion {
    pub run_id: RunId,
    pub job_id: Option<JobId>,
    pub outcome: RunOutcome,

    /// Number of status polls issued before the terminal state was seen
    pub polls: u32,

    pub observed_at: DateTime<Utc>,
}
