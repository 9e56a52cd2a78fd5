//! Scripted sources and recording sinks for scheduler tests

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use syncwatch_core::domain::agent::{Agent, AgentId};
use syncwatch_core::domain::job::{Job, JobId};
use syncwatch_core::domain::run::{RunCompletion, RunId, RunState, RunStatusReport};
use syncwatch_core::snapshot::AgentSet;

use crate::error::SourceError;
use crate::repository::{AgentSource, JobSource, RunStatusSource};
use crate::service::NotificationSink;

pub fn agent(id: u64) -> Agent {
    Agent {
        id: AgentId(id),
        name: format!("agent-{}", id),
        online: id % 2 == 0,
    }
}

pub fn agents(ids: &[u64]) -> Vec<Agent> {
    ids.iter().copied().map(agent).collect()
}

pub fn set(ids: &[u64]) -> AgentSet {
    ids.iter().copied().map(AgentId).collect()
}

pub fn transport_error() -> SourceError {
    SourceError::Transport("connection refused".to_string())
}

/// Agent source answering from a queue; repeats the last answer once drained
#[derive(Default)]
pub struct ScriptedAgentSource {
    script: Mutex<VecDeque<Result<Vec<Agent>, SourceError>>>,
    last: Mutex<Option<Result<Vec<Agent>, SourceError>>>,
    fetches: Mutex<u32>,
    latency: Option<Duration>,
}

impl ScriptedAgentSource {
    pub fn new(script: Vec<Result<Vec<Agent>, SourceError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    /// Every fetch takes `latency` of (virtual) time
    pub fn with_latency(script: Vec<Result<Vec<Agent>, SourceError>>, latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::new(script)
        }
    }

    pub fn fetches(&self) -> u32 {
        *self.fetches.lock()
    }
}

#[async_trait]
impl AgentSource for ScriptedAgentSource {
    async fn fetch_agents(&self) -> Result<Vec<Agent>, SourceError> {
        *self.fetches.lock() += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let next = self.script.lock().pop_front();
        match next {
            Some(answer) => {
                *self.last.lock() = Some(answer.clone());
                answer
            }
            None => self.last.lock().clone().unwrap_or_else(|| Ok(Vec::new())),
        }
    }
}

/// Run status source with a per-run queue of answers
///
/// Once a run's queue is drained it keeps answering `running`.
#[derive(Default)]
pub struct ScriptedRunSource {
    scripts: Mutex<HashMap<RunId, VecDeque<Result<RunStatusReport, SourceError>>>>,
    polls: Mutex<HashMap<RunId, u32>>,
    latency: Option<Duration>,
}

impl ScriptedRunSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every fetch takes `latency` of (virtual) time
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Default::default()
        }
    }

    pub fn script(&self, run_id: RunId, answers: Vec<Result<RunStatusReport, SourceError>>) {
        self.scripts.lock().insert(run_id, answers.into());
    }

    pub fn polls(&self, run_id: RunId) -> u32 {
        self.polls.lock().get(&run_id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl RunStatusSource for ScriptedRunSource {
    async fn fetch_run_status(&self, run_id: RunId) -> Result<RunStatusReport, SourceError> {
        *self.polls.lock().entry(run_id).or_default() += 1;

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let next = self
            .scripts
            .lock()
            .get_mut(&run_id)
            .and_then(|queue| queue.pop_front());
        next.unwrap_or_else(|| Ok(running(1)))
    }
}

pub fn running(job_id: u64) -> RunStatusReport {
    RunStatusReport::new(JobId(job_id), RunState::Running)
}

pub fn finished(job_id: u64) -> RunStatusReport {
    RunStatusReport::new(JobId(job_id), RunState::Finished)
}

/// Job source returning a fixed answer
pub struct StaticJobSource(pub Result<Vec<Job>, SourceError>);

#[async_trait]
impl JobSource for StaticJobSource {
    async fn fetch_jobs(&self) -> Result<Vec<Job>, SourceError> {
        self.0.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Changed(AgentSet),
    Unchanged,
    JobFinished(RunCompletion),
}

/// Sink that records every callback in order
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn on_agents_changed(&self, delta: &AgentSet) {
        self.events.lock().push(Event::Changed(delta.clone()));
    }

    fn on_agents_unchanged(&self) {
        self.events.lock().push(Event::Unchanged);
    }

    fn on_job_finished(&self, completion: &RunCompletion) {
        self.events.lock().push(Event::JobFinished(completion.clone()));
    }
}
