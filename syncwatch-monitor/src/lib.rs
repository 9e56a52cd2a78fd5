//! Syncwatch Monitor
//!
//! Polling engine that keeps track of the agents and job runs of a
//! Management Console.
//!
//! Architecture:
//! - Configuration: daemon settings loaded from the environment
//! - Repositories: source traits over the console API (agents, jobs, runs)
//! - Services: property store and notification sinks
//! - Scheduler: agent reconciliation loop, job index refresh and per-run monitors
//!
//! Every recurring task is driven by a [`scheduler::Schedule`]: the next tick
//! is only scheduled once the current one has been fully processed, and each
//! task can be stopped through its [`scheduler::TaskHandle`].

pub mod config;
pub mod error;
pub mod repository;
pub mod scheduler;
pub mod service;

pub use error::{EngineError, SourceError};
