//! Agent reconciliation loop
//!
//! Periodically fetches the agent list, compares it with the previous
//! snapshot and reports the difference. The first successful cycle only
//! establishes the baseline and never notifies.

use std::sync::Arc;
use std::time::Duration;
use syncwatch_core::domain::agent::Agent;
use syncwatch_core::snapshot::{self, AgentSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{EngineError, SourceError};
use crate::repository::AgentSource;
use crate::scheduler::schedule::{Schedule, TaskHandle};
use crate::service::{AGENT_NAME, AGENT_ONLINE, NotificationSink, PropertyStore};

/// What a single reconciliation cycle observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// First successful cycle; no notification was sent
    Baseline { agents: usize },

    /// Agents were added or removed since the previous cycle
    Changed(AgentSet),

    /// Same agents as the previous cycle
    Unchanged,

    /// The fetch failed; state was left untouched
    Failed,
}

/// Owns the snapshot state of the reconciliation loop
pub struct AgentReconciler {
    source: Arc<dyn AgentSource>,
    store: Arc<PropertyStore>,
    sink: Arc<dyn NotificationSink>,
    previous: AgentSet,
    cycles: u64,
}

impl AgentReconciler {
    pub fn new(
        source: Arc<dyn AgentSource>,
        store: Arc<PropertyStore>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            source,
            store,
            sink,
            previous: AgentSet::new(),
            cycles: 0,
        }
    }

    /// Number of successful cycles so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Snapshot recorded by the last successful cycle
    pub fn previous(&self) -> &AgentSet {
        &self.previous
    }

    /// Runs one reconciliation cycle
    pub async fn tick(&mut self) -> TickOutcome {
        let fetched = self.source.fetch_agents().await;
        self.reconcile(fetched)
    }

    /// Starts the loop on its own task
    ///
    /// The first cycle runs immediately; each following one starts
    /// `interval` after the previous one completed.
    pub fn start(self, interval: Duration) -> Result<TaskHandle, EngineError> {
        let cancel = CancellationToken::new();
        let schedule = Schedule::new(interval, cancel.clone())?;

        info!("Starting agent reconciliation (interval: {:?})", interval);
        Ok(TaskHandle::spawn("agent-reconciler", cancel, self.run(schedule)))
    }

    async fn run(mut self, schedule: Schedule) {
        loop {
            let fetched = self.source.fetch_agents().await;
            if schedule.is_cancelled() {
                debug!("Reconciler stopped, discarding in-flight agent list");
                break;
            }

            self.reconcile(fetched);

            if !schedule.wait().await {
                break;
            }
        }

        info!("Agent reconciliation stopped after {} cycle(s)", self.cycles);
    }

    fn reconcile(&mut self, fetched: Result<Vec<Agent>, SourceError>) -> TickOutcome {
        let agents = match fetched {
            Ok(agents) => agents,
            Err(e) => {
                warn!("Failed to fetch agent list: {}", e);
                return TickOutcome::Failed;
            }
        };

        let current: AgentSet = agents.iter().map(|a| a.id).collect();
        let delta = snapshot::diff(&current, &self.previous);

        let outcome = if self.cycles == 0 {
            debug!("Baseline agent snapshot: {} agent(s)", current.len());
            TickOutcome::Baseline {
                agents: current.len(),
            }
        } else if delta.is_empty() {
            self.sink.on_agents_unchanged();
            TickOutcome::Unchanged
        } else {
            self.sink.on_agents_changed(&delta);
            TickOutcome::Changed(delta)
        };

        for agent in &agents {
            self.store
                .set_agent_property(agent.id, AGENT_NAME, agent.name.clone());
            self.store
                .set_agent_property(agent.id, AGENT_ONLINE, agent.online);
        }

        self.previous = current;
        self.cycles += 1;
        outcome
    }
}
