//! Job run monitor
//!
//! Watches individual job runs until the console reports them finished or
//! no longer knows them. Each watched run gets its own polling task; the
//! monitor only keeps a registry of the active ones so a run is never
//! watched twice.
//!
//! Lifecycle of a watched run:
//! 1. `watch` registers the run and spawns its task
//! 2. every interval the task fetches the run status
//! 3. on a terminal status the run is removed from the registry and the
//!    completion handler is called, exactly once
//!
//! Fetch failures are logged and polling continues. Cancelling a run drops
//! it without calling its handler.

use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use syncwatch_core::domain::job::JobId;
use syncwatch_core::domain::run::{RunCompletion, RunId, RunState, RunStatusReport};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::repository::RunStatusSource;
use crate::scheduler::schedule::{Schedule, TaskHandle};
use crate::service::NotificationSink;

/// Result of a `watch` request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// A new monitor was started for the run
    Started,

    /// The run was already being watched; nothing was created
    AlreadyActive,
}

struct ActiveRun {
    generation: u64,
    handle: TaskHandle,
}

#[derive(Default)]
struct Registry {
    runs: HashMap<RunId, ActiveRun>,
    next_generation: u64,
}

/// Registry and factory of per-run monitors
#[derive(Clone)]
pub struct RunMonitor {
    source: Arc<dyn RunStatusSource>,
    schedule: Schedule,
    registry: Arc<Mutex<Registry>>,
}

impl RunMonitor {
    /// Creates a monitor polling every `interval`
    pub fn new(source: Arc<dyn RunStatusSource>, interval: Duration) -> Result<Self, EngineError> {
        let schedule = Schedule::new(interval, CancellationToken::new())?;

        Ok(Self {
            source,
            schedule,
            registry: Arc::new(Mutex::new(Registry::default())),
        })
    }

    pub fn interval(&self) -> Duration {
        self.schedule.interval()
    }

    /// Starts watching a run
    ///
    /// The first poll happens one interval from now. `on_complete` is called
    /// once the run finishes or is reported missing. If the run is already
    /// watched, `on_complete` is dropped and the existing monitor is kept.
    pub fn watch<F>(&self, run_id: RunId, on_complete: F) -> WatchOutcome
    where
        F: FnOnce(RunCompletion) + Send + 'static,
    {
        let mut registry = self.registry.lock();
        if registry.runs.contains_key(&run_id) {
            debug!("Run {} is already monitored", run_id);
            return WatchOutcome::AlreadyActive;
        }

        let generation = registry.next_generation;
        registry.next_generation += 1;

        let cancel = CancellationToken::new();
        let schedule = self.schedule.with_cancellation(cancel.clone());

        let task = MonitorTask {
            state: MonitorState::new(run_id),
            generation,
            source: Arc::clone(&self.source),
            registry: Arc::clone(&self.registry),
        };

        info!("Monitoring run {} (interval: {:?})", run_id, self.interval());
        let handle = TaskHandle::spawn(
            format!("run-monitor-{}", run_id),
            cancel,
            task.run(schedule, on_complete),
        );
        registry.runs.insert(run_id, ActiveRun { generation, handle });

        WatchOutcome::Started
    }

    /// Starts watching a run and returns a receiver for its completion
    ///
    /// Returns `None` if the run is already watched.
    pub fn watch_channel(&self, run_id: RunId) -> Option<oneshot::Receiver<RunCompletion>> {
        let (tx, rx) = oneshot::channel();
        let outcome = self.watch(run_id, move |completion| {
            let _ = tx.send(completion);
        });

        match outcome {
            WatchOutcome::Started => Some(rx),
            WatchOutcome::AlreadyActive => None,
        }
    }

    /// Starts watching a run and reports its completion to `sink`
    pub fn watch_with_sink(&self, run_id: RunId, sink: Arc<dyn NotificationSink>) -> WatchOutcome {
        self.watch(run_id, move |completion| sink.on_job_finished(&completion))
    }

    /// Stops watching a run without calling its completion handler
    ///
    /// Returns `false` if the run was not being watched.
    pub fn cancel(&self, run_id: RunId) -> bool {
        let removed = self.registry.lock().runs.remove(&run_id);
        match removed {
            Some(active) => {
                info!("Cancelled monitoring of run {}", run_id);
                active.handle.stop();
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self, run_id: RunId) -> bool {
        self.registry.lock().runs.contains_key(&run_id)
    }

    /// Runs currently being watched, in ascending order
    pub fn active_runs(&self) -> Vec<RunId> {
        let mut runs: Vec<RunId> = self.registry.lock().runs.keys().copied().collect();
        runs.sort_unstable();
        runs
    }

    /// Cancels every active monitor
    pub fn shutdown(&self) {
        let drained: Vec<(RunId, ActiveRun)> = self.registry.lock().runs.drain().collect();
        if !drained.is_empty() {
            info!("Stopping {} run monitor(s)", drained.len());
        }
        for (_, active) in drained {
            active.handle.stop();
        }
    }
}

/// Last observed status of a watched run
#[derive(Debug, Clone)]
struct MonitorState {
    run_id: RunId,
    job_id: Option<JobId>,
    last_status: Option<RunState>,
    last_code: Option<u16>,
    polls: u32,
}

impl MonitorState {
    fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            job_id: None,
            last_status: None,
            last_code: None,
            polls: 0,
        }
    }

    /// Records a report; returns the completion if it is terminal
    fn observe(&mut self, report: RunStatusReport) -> Option<RunCompletion> {
        let outcome = report.outcome();

        if report.job_id.is_some() {
            self.job_id = report.job_id;
        }
        if self.last_status.as_ref() != Some(&report.status) {
            debug!("Run {} is {}", self.run_id, report.status);
        }
        self.last_status = Some(report.status);
        self.last_code = report.code;

        outcome.map(|outcome| RunCompletion {
            run_id: self.run_id,
            job_id: self.job_id,
            outcome,
            polls: self.polls,
            observed_at: Utc::now(),
        })
    }
}

struct MonitorTask {
    state: MonitorState,
    generation: u64,
    source: Arc<dyn RunStatusSource>,
    registry: Arc<Mutex<Registry>>,
}

impl MonitorTask {
    async fn run<F>(mut self, schedule: Schedule, on_complete: F)
    where
        F: FnOnce(RunCompletion) + Send + 'static,
    {
        let run_id = self.state.run_id;

        while schedule.wait().await {
            let fetched = self.source.fetch_run_status(run_id).await;
            if schedule.is_cancelled() {
                debug!("Run {} monitor cancelled, discarding poll result", run_id);
                return;
            }

            self.state.polls += 1;
            match fetched {
                Ok(report) => {
                    if let Some(completion) = self.state.observe(report) {
                        if !self.retire() {
                            debug!("Run {} monitor was cancelled, dropping completion", run_id);
                            return;
                        }
                        info!(
                            "Run {} {} after {} poll(s)",
                            run_id, completion.outcome, completion.polls
                        );
                        on_complete(completion);
                        return;
                    }
                }
                Err(e) => {
                    warn!(
                        "Failed to fetch status of run {} (poll {}): {}",
                        run_id, self.state.polls, e
                    );
                }
            }
        }

        debug!(
            "Run {} monitor stopped (last status: {:?}, code: {:?})",
            run_id, self.state.last_status, self.state.last_code
        );
    }

    /// Removes this run from the registry
    ///
    /// Returns false when the entry was cancelled or replaced by a newer watch,
    /// in which case the completion belongs to nobody.
    fn retire(&self) -> bool {
        let mut registry = self.registry.lock();
        let ours = registry
            .runs
            .get(&self.state.run_id)
            .is_some_and(|active| active.generation == self.generation);
        if ours {
            registry.runs.remove(&self.state.run_id);
        }
        ours
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::scheduler::testing::{
        Event, RecordingSink, ScriptedRunSource, finished, running, transport_error,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use syncwatch_core::domain::run::RunOutcome;
    use tokio::time::{self, Instant};

    const INTERVAL: Duration = Duration::from_secs(5);

    fn monitor(source: &Arc<ScriptedRunSource>) -> RunMonitor {
        RunMonitor::new(source.clone(), INTERVAL).unwrap()
    }

    fn counting_callback(counter: &Arc<AtomicU32>) -> impl FnOnce(RunCompletion) + Send + 'static {
        let counter = Arc::clone(counter);
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_zero_interval_rejected() {
        let source = Arc::new(ScriptedRunSource::new());
        assert_eq!(
            RunMonitor::new(source, Duration::ZERO).err(),
            Some(EngineError::InvalidInterval)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_finished() {
        let source = Arc::new(ScriptedRunSource::new());
        source.script(
            RunId(7),
            vec![Ok(running(3)), Ok(running(3)), Ok(running(3)), Ok(finished(3))],
        );
        let monitor = monitor(&source);
        let start = Instant::now();

        let completion = monitor.watch_channel(RunId(7)).unwrap().await.unwrap();

        assert!(start.elapsed() >= INTERVAL * 4);
        assert_eq!(completion.run_id, RunId(7));
        assert_eq!(completion.job_id, Some(JobId(3)));
        assert_eq!(completion.outcome, RunOutcome::Finished);
        assert_eq!(completion.polls, 4);
        assert_eq!(source.polls(RunId(7)), 4);
        assert!(!monitor.is_active(RunId(7)));

        // Retired: no further polls
        time::sleep(INTERVAL * 10).await;
        assert_eq!(source.polls(RunId(7)), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_fires_once() {
        let source = Arc::new(ScriptedRunSource::new());
        source.script(RunId(7), vec![Ok(running(3)), Ok(finished(3)), Ok(finished(3))]);
        let monitor = monitor(&source);
        let calls = Arc::new(AtomicU32::new(0));

        assert_eq!(
            monitor.watch(RunId(7), counting_callback(&calls)),
            WatchOutcome::Started
        );

        time::sleep(INTERVAL * 10).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.polls(RunId(7)), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_retires_immediately_and_rewatch_starts_fresh() {
        let source = Arc::new(ScriptedRunSource::new());
        source.script(RunId(9), vec![Ok(RunStatusReport::not_found())]);
        let monitor = monitor(&source);

        let completion = monitor.watch_channel(RunId(9)).unwrap().await.unwrap();
        assert_eq!(completion.outcome, RunOutcome::NotFound);
        assert_eq!(completion.job_id, None);
        assert_eq!(completion.polls, 1);
        assert!(!monitor.is_active(RunId(9)));

        source.script(RunId(9), vec![Ok(running(2)), Ok(finished(2))]);
        let completion = monitor.watch_channel(RunId(9)).unwrap().await.unwrap();
        assert_eq!(completion.outcome, RunOutcome::Finished);
        assert_eq!(completion.polls, 2);
        assert_eq!(source.polls(RunId(9)), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_code_404_is_terminal() {
        let source = Arc::new(ScriptedRunSource::new());
        let report = RunStatusReport {
            job_id: Some(JobId(4)),
            status: RunState::Other("error".to_string()),
            code: Some(404),
        };
        source.script(RunId(1), vec![Ok(report)]);
        let monitor = monitor(&source);

        let completion = monitor.watch_channel(RunId(1)).unwrap().await.unwrap();
        assert_eq!(completion.outcome, RunOutcome::NotFound);
        assert_eq!(completion.job_id, Some(JobId(4)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_watch_is_noop() {
        let source = Arc::new(ScriptedRunSource::new());
        source.script(RunId(5), vec![Ok(running(1)), Ok(finished(1))]);
        let monitor = monitor(&source);
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));

        assert_eq!(
            monitor.watch(RunId(5), counting_callback(&first)),
            WatchOutcome::Started
        );
        assert_eq!(
            monitor.watch(RunId(5), counting_callback(&second)),
            WatchOutcome::AlreadyActive
        );
        assert!(monitor.watch_channel(RunId(5)).is_none());
        assert_eq!(monitor.active_runs(), vec![RunId(5)]);

        time::sleep(INTERVAL * 4).await;
        assert_eq!(source.polls(RunId(5)), 2);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failures_keep_polling() {
        let source = Arc::new(ScriptedRunSource::new());
        source.script(
            RunId(3),
            vec![
                Err(transport_error()),
                Err(SourceError::Malformed("no status".to_string())),
                Ok(finished(8)),
            ],
        );
        let monitor = monitor(&source);

        let completion = monitor.watch_channel(RunId(3)).unwrap().await.unwrap();
        assert_eq!(completion.polls, 3);
        assert_eq!(completion.outcome, RunOutcome::Finished);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_monitors_are_independent() {
        let source = Arc::new(ScriptedRunSource::new());
        source.script(RunId(1), vec![Ok(finished(10))]);
        source.script(
            RunId(2),
            vec![Ok(running(20)), Ok(running(20)), Ok(finished(20))],
        );
        let monitor = monitor(&source);
        let calls_1 = Arc::new(AtomicU32::new(0));
        let calls_2 = Arc::new(AtomicU32::new(0));

        monitor.watch(RunId(1), counting_callback(&calls_1));
        monitor.watch(RunId(2), counting_callback(&calls_2));

        time::sleep(INTERVAL + Duration::from_secs(1)).await;
        assert_eq!(calls_1.load(Ordering::SeqCst), 1);
        assert_eq!(calls_2.load(Ordering::SeqCst), 0);
        assert_eq!(monitor.active_runs(), vec![RunId(2)]);

        time::sleep(INTERVAL * 5).await;
        assert_eq!(calls_1.load(Ordering::SeqCst), 1);
        assert_eq!(calls_2.load(Ordering::SeqCst), 1);
        assert_eq!(source.polls(RunId(1)), 1);
        assert_eq!(source.polls(RunId(2)), 3);
        assert!(monitor.active_runs().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_monitor_never_calls_back() {
        let source = Arc::new(ScriptedRunSource::new());
        source.script(RunId(6), vec![Ok(finished(1))]);
        let monitor = monitor(&source);
        let calls = Arc::new(AtomicU32::new(0));

        monitor.watch(RunId(6), counting_callback(&calls));
        assert!(monitor.cancel(RunId(6)));
        assert!(!monitor.cancel(RunId(6)));

        time::sleep(INTERVAL * 3).await;
        assert_eq!(source.polls(RunId(6)), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_result_discarded_after_cancel() {
        let source = Arc::new(ScriptedRunSource::with_latency(Duration::from_secs(30)));
        source.script(RunId(2), vec![Ok(finished(1))]);
        let monitor = monitor(&source);
        let calls = Arc::new(AtomicU32::new(0));

        monitor.watch(RunId(2), counting_callback(&calls));

        // First poll starts at t=5 and resolves at t=35
        time::sleep(INTERVAL + Duration::from_secs(1)).await;
        assert_eq!(source.polls(RunId(2)), 1);
        monitor.shutdown();

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(source.polls(RunId(2)), 1);
        assert!(monitor.active_runs().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_reported_to_sink() {
        let source = Arc::new(ScriptedRunSource::new());
        source.script(RunId(11), vec![Ok(finished(4))]);
        let monitor = monitor(&source);
        let sink = Arc::new(RecordingSink::default());

        monitor.watch_with_sink(RunId(11), sink.clone());
        time::sleep(INTERVAL * 2).await;

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            Event::JobFinished(c) if c.run_id == RunId(11) && c.job_id == Some(JobId(4))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_may_rewatch_same_run() {
        let source = Arc::new(ScriptedRunSource::new());
        source.script(RunId(8), vec![Ok(finished(1))]);
        let monitor = monitor(&source);

        let rewatch = monitor.clone();
        let outcome = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&outcome);
        monitor.watch(RunId(8), move |_| {
            *seen.lock() = Some(rewatch.watch(RunId(8), |_| {}));
        });

        time::sleep(INTERVAL + Duration::from_secs(1)).await;
        assert_eq!(*outcome.lock(), Some(WatchOutcome::Started));
        assert!(monitor.is_active(RunId(8)));
        monitor.shutdown();
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_dropped_when_entry_no_longer_owned() {
        let source = Arc::new(ScriptedRunSource::new());
        source.script(RunId(4), vec![Ok(finished(1)), Ok(finished(1))]);
        let monitor = monitor(&source);
        let calls = Arc::new(AtomicU32::new(0));

        let stale_task = |generation| MonitorTask {
            state: MonitorState::new(RunId(4)),
            generation,
            source: source.clone(),
            registry: Arc::clone(&monitor.registry),
        };
        // Polls ahead of the registered monitor
        let schedule = || Schedule::new(Duration::from_secs(1), CancellationToken::new()).unwrap();

        // Entry removed by a cancel that raced the terminal poll
        stale_task(0)
            .run(schedule(), counting_callback(&calls))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Entry replaced by a newer watch of the same run
        let current = Arc::new(AtomicU32::new(0));
        monitor.watch(RunId(4), counting_callback(&current));
        stale_task(u64::MAX)
            .run(schedule(), counting_callback(&calls))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(monitor.is_active(RunId(4)));

        monitor.shutdown();
        assert_eq!(current.load(Ordering::SeqCst), 0);
    }
}
