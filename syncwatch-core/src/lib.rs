//! Syncwatch Core
//!
//! Core types and abstractions shared by the syncwatch crates.
//!
//! This crate contains:
//! - Domain types: agents, jobs and job runs as reported by the Management Console
//! - DTOs: request/response bodies for the Management Console API
//! - Snapshot diffing used by the agent reconciliation loop

pub mod domain;
pub mod dto;
pub mod snapshot;
