//! Agent domain model
//!
//! Represents a managed node registered with the Management Console.

use serde::{Deserialize, Serialize};

/// Identifier assigned to an agent by the Management Console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u64);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AgentId {
    fn from(id: u64) -> Self {
        AgentId(id)
    }
}

/// An agent as listed by `GET /agents`
///
/// The console returns many more fields; only the ones the monitor tracks
/// are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier for the agent
    pub id: AgentId,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Whether the agent is currently connected to the console
    #[serde(default)]
    pub online: bool,
}

impl Agent {
    /// Human readable connectivity label
    pub fn status_label(&self) -> &'static str {
        if self.online { "Online" } else { "Offline" }
    }
}
