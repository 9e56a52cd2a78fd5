//! Agents repository
//!
//! Fetches the agent list from the console. The reconciliation loop derives
//! both the snapshot and the cached agent properties from one fetch.

use async_trait::async_trait;
use std::sync::Arc;
use syncwatch_client::McClient;
use syncwatch_core::domain::agent::Agent;
use syncwatch_core::snapshot::AgentSet;

use crate::error::SourceError;

/// Source of the current agent population
#[async_trait]
pub trait AgentSource: Send + Sync {
    /// Fetches every agent with its name and online status
    async fn fetch_agents(&self) -> Result<Vec<Agent>, SourceError>;

    /// Fetches only the identifiers of the current agents
    async fn fetch_agent_identifiers(&self) -> Result<AgentSet, SourceError> {
        let agents = self.fetch_agents().await?;
        Ok(agents.into_iter().map(|a| a.id).collect())
    }
}

/// HTTP implementation of AgentSource
pub struct HttpAgentSource {
    client: Arc<McClient>,
}

impl HttpAgentSource {
    /// Creates a new agent source backed by the given console client
    pub fn new(client: Arc<McClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AgentSource for HttpAgentSource {
    async fn fetch_agents(&self) -> Result<Vec<Agent>, SourceError> {
        Ok(self.client.list_agents().await?)
    }
}
