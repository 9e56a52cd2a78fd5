//! Property store
//!
//! In-memory cache of agent and job properties keyed by id. Values are kept
//! as JSON so the console's fields can be stored without a schema.
//! Setting a property only replaces that key; other keys of the entity are kept.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use syncwatch_core::domain::agent::AgentId;
use syncwatch_core::domain::job::JobId;
use syncwatch_core::snapshot::AgentSet;

use crate::error::EngineError;

/// Agent display name
pub const AGENT_NAME: &str = "name";

/// Agent connectivity (bool)
pub const AGENT_ONLINE: &str = "online";

/// Ids of the agents assigned to a job (array of numbers)
pub const JOB_AGENTS: &str = "agents";

type Properties = HashMap<String, Value>;

/// Thread-safe property cache for agents and jobs
#[derive(Debug, Default)]
pub struct PropertyStore {
    agents: RwLock<HashMap<AgentId, Properties>>,
    jobs: RwLock<HashMap<JobId, Properties>>,
}

impl PropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_agent_property(&self, id: AgentId, key: &str, value: impl Into<Value>) {
        self.agents
            .write()
            .entry(id)
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Returns a cached agent property
    ///
    /// Fails with `UnknownAgent` if the agent was never observed, and with
    /// `UnknownProperty` if it was observed but `key` was never set.
    pub fn get_agent_property(&self, id: AgentId, key: &str) -> Result<Value, EngineError> {
        let agents = self.agents.read();
        let props = agents.get(&id).ok_or(EngineError::UnknownAgent(id))?;
        lookup(props, key, || format!("agent {}", id))
    }

    /// Ids of every agent with cached properties
    pub fn agent_ids(&self) -> AgentSet {
        self.agents.read().keys().copied().collect()
    }

    pub fn set_job_property(&self, id: JobId, key: &str, value: impl Into<Value>) {
        self.jobs
            .write()
            .entry(id)
            .or_default()
            .insert(key.to_string(), value.into());
    }

    pub fn get_job_property(&self, id: JobId, key: &str) -> Result<Value, EngineError> {
        let jobs = self.jobs.read();
        let props = jobs.get(&id).ok_or(EngineError::UnknownJob(id))?;
        lookup(props, key, || format!("job {}", id))
    }
}

fn lookup(
    props: &Properties,
    key: &str,
    entity: impl FnOnce() -> String,
) -> Result<Value, EngineError> {
    props
        .get(key)
        .cloned()
        .ok_or_else(|| EngineError::UnknownProperty {
            entity: entity(),
            key: key.to_string(),
        })
}
