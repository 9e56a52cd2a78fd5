//! Configuration module
//!
//! Connection settings shared by every command.

use anyhow::{Context, Result};
use std::time::Duration;
use syncwatch_client::McClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Management Console host name
    pub host: String,

    /// Management Console API port
    pub port: u16,

    /// API token
    pub token: String,

    /// Interval used by the watch commands
    pub poll_interval: Duration,
}

impl Config {
    /// Builds a console client from these settings
    pub fn client(&self) -> Result<McClient> {
        McClient::for_host(&self.host, self.port, &self.token)
            .context("Failed to create console client")
    }
}
