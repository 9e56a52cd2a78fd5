//! Core domain types
//!
//! This module contains the entities observed on the Management Console.
//! They are shared between the HTTP client (which decodes them) and the
//! monitor (which tracks and diffs them).

pub mod agent;
pub mod job;
pub mod run;
