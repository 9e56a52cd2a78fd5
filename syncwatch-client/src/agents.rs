//! Agent-related API endpoints

use crate::McClient;
use crate::error::Result;
use syncwatch_core::domain::agent::{Agent, AgentId};

impl McClient {
    // =============================================================================
    // Agent Query
    // =============================================================================

    /// List every agent registered with the console
    ///
    /// # Returns
    /// All agents, online or not
    pub async fn list_agents(&self) -> Result<Vec<Agent>> {
        let response = self.client.get(self.url("/agents")).send().await?;

        self.handle_response(response).await
    }

    /// Get details for a single agent
    ///
    /// # Arguments
    /// * `agent_id` - The agent id
    pub async fn get_agent(&self, agent_id: AgentId) -> Result<Agent> {
        let url = self.url(&format!("/agents/{}", agent_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
