//! Job domain types

use serde::{Deserialize, Serialize};

use super::agent::AgentId;

/// Identifier of a job definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        JobId(id)
    }
}

/// Job definition as stored on the Management Console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub job_type: String,
    #[serde(default)]
    pub agents: Vec<JobAgent>,
}

impl Job {
    /// Ids of every agent assigned to this job
    pub fn agent_ids(&self) -> Vec<AgentId> {
        self.agents.iter().map(|a| a.id).collect()
    }
}

/// An agent's participation in a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAgent {
    pub id: AgentId,
    pub permission: String,
    #[serde(default)]
    pub path: AgentPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_config_id: Option<u64>,
}

impl JobAgent {
    /// Builds an entry that uses the same folder path on every platform
    pub fn new(id: AgentId, permission: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id,
            permission: permission.into(),
            path: AgentPath::uniform(path),
            storage_config_id: None,
        }
    }

    /// Attaches a cloud storage configuration to this entry
    pub fn with_storage(mut self, storage_config_id: u64) -> Self {
        self.storage_config_id = Some(storage_config_id);
        self
    }
}

/// Per-platform folder path for a job agent
///
/// Consoles only return the platforms a job was configured for, so every
/// entry is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentPath {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub osx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xbox: Option<String>,
}

impl AgentPath {
    pub fn uniform(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            linux: Some(path.clone()),
            win: Some(path.clone()),
            osx: Some(path.clone()),
            android: Some(path.clone()),
            xbox: Some(path),
        }
    }
}
