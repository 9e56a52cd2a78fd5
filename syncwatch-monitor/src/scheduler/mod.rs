//! Scheduler layer
//!
//! This layer drives every recurring poll against the console: the agent
//! reconciliation loop, the job index refresh and one monitor per watched
//! run. Each of them runs as its own task on a [`Schedule`] and is stopped
//! through the [`TaskHandle`] returned when it is started.

pub mod job_index;
pub mod reconciler;
pub mod run_monitor;
pub mod schedule;

#[cfg(test)]
mod testing;

pub use job_index::JobIndexRefresher;
pub use reconciler::{AgentReconciler, TickOutcome};
pub use run_monitor::{RunMonitor, WatchOutcome};
pub use schedule::{Schedule, TaskHandle};
