//! Notification sinks
//!
//! Receivers of the events the scheduler raises. Sinks are called from the
//! task that observed the event and must return promptly.

use syncwatch_core::domain::run::RunCompletion;
use syncwatch_core::snapshot::AgentSet;
use tracing::{debug, info};

/// Callbacks raised by the reconciliation loop and the run monitor
pub trait NotificationSink: Send + Sync {
    /// The agent population changed; `delta` holds added and removed ids
    fn on_agents_changed(&self, delta: &AgentSet);

    /// The agent population is identical to the previous cycle
    fn on_agents_unchanged(&self);

    /// A monitored run reached a terminal state
    fn on_job_finished(&self, completion: &RunCompletion);
}

/// Sink that reports every event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSink;

impl NotificationSink for LoggingSink {
    fn on_agents_changed(&self, delta: &AgentSet) {
        let mut ids: Vec<_> = delta.iter().map(|id| id.0).collect();
        ids.sort_unstable();
        info!("Agent list changed: {:?}", ids);
    }

    fn on_agents_unchanged(&self) {
        debug!("Agent list unchanged");
    }

    fn on_job_finished(&self, completion: &RunCompletion) {
        match completion.job_id {
            Some(job_id) => info!(
                "Run {} of job {} {} after {} poll(s)",
                completion.run_id, job_id, completion.outcome, completion.polls
            ),
            None => info!(
                "Run {} {} after {} poll(s)",
                completion.run_id, completion.outcome, completion.polls
            ),
        }
    }
}
