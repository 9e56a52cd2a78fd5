//! Recurring schedule
//!
//! A [`Schedule`] spaces the iterations of a polling loop by a fixed
//! interval measured from the end of the previous iteration, so a slow
//! fetch pushes the next one back instead of overlapping it.
//! Cancellation is observed while waiting and can be checked after each
//! fetch so in-flight results are discarded.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::EngineError;

/// Fixed-interval, cancellable pacing for a polling loop
#[derive(Debug, Clone)]
pub struct Schedule {
    interval: Duration,
    cancel: CancellationToken,
}

impl Schedule {
    /// Creates a schedule, rejecting a zero interval
    pub fn new(interval: Duration, cancel: CancellationToken) -> Result<Self, EngineError> {
        if interval.is_zero() {
            return Err(EngineError::InvalidInterval);
        }
        Ok(Self { interval, cancel })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Same interval, observing a different token
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            interval: self.interval,
            cancel,
        }
    }

    /// Waits one interval
    ///
    /// Returns `false` as soon as the schedule is cancelled.
    pub async fn wait(&self) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = time::sleep(self.interval) => true,
        }
    }
}

/// Handle to a spawned recurring task
///
/// Dropping the handle detaches the task; call [`TaskHandle::stop`] to end it.
#[derive(Debug)]
pub struct TaskHandle {
    name: String,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawns `task` on the runtime; `cancel` must be the token its schedule observes
    pub fn spawn<F>(name: impl Into<String>, cancel: CancellationToken, task: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        debug!("Spawning task {}", name);

        Self {
            name,
            cancel,
            join: tokio::spawn(task),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requests the task to stop scheduling further iterations
    pub fn stop(&self) {
        debug!("Stopping task {}", self.name);
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Waits for the task to exit
    pub async fn join(self) {
        if let Err(e) = self.join.await {
            warn!("Task {} panicked: {}", self.name, e);
        }
    }
}
