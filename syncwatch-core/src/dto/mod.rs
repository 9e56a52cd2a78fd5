//! Data Transfer Objects for the Management Console API
//!
//! Request and response bodies that are not domain entities in their own
//! right (creation requests, id envelopes).

pub mod job;
pub mod run;

use serde::{Deserialize, Serialize};

/// Body returned by the console for every create call
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Created {
    pub id: u64,
}

/// Error body returned by the console on failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
}
