//! Monitor configuration
//!
//! Defines all configurable parameters for the monitor daemon including
//! the console connection and the polling intervals of each task.

use std::time::Duration;
use syncwatch_core::domain::run::RunId;

/// Monitor configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Management Console host name
    pub mc_host: String,

    /// Management Console API port
    pub mc_port: u16,

    /// API token issued by the console
    pub mc_token: String,

    /// How often to reconcile the agent list
    pub agent_poll_interval: Duration,

    /// How often to refresh the job/agent index
    pub job_index_interval: Duration,

    /// How often to poll the status of watched runs
    pub run_poll_interval: Duration,

    /// Runs to watch from startup until they complete
    pub watch_runs: Vec<RunId>,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(mc_host: String, mc_token: String) -> Self {
        Self {
            mc_host,
            mc_port: 8443,
            mc_token,
            agent_poll_interval: Duration::from_secs(10),
            job_index_interval: Duration::from_secs(60),
            run_poll_interval: Duration::from_secs(5),
            watch_runs: Vec::new(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - MC_HOST (required)
    /// - MC_TOKEN (required)
    /// - MC_PORT (optional, default: 8443)
    /// - AGENT_POLL_INTERVAL (optional, seconds, default: 10)
    /// - JOB_INDEX_INTERVAL (optional, seconds, default: 60)
    /// - RUN_POLL_INTERVAL (optional, seconds, default: 5)
    /// - WATCH_RUNS (optional, comma separated run ids)
    pub fn from_env() -> anyhow::Result<Self> {
        let mc_host = std::env::var("MC_HOST")
            .map_err(|_| anyhow::anyhow!("MC_HOST environment variable not set"))?;

        let mc_token = std::env::var("MC_TOKEN")
            .map_err(|_| anyhow::anyhow!("MC_TOKEN environment variable not set"))?;

        let mut config = Self::new(mc_host, mc_token);

        if let Some(port) = std::env::var("MC_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
        {
            config.mc_port = port;
        }

        if let Some(interval) = seconds_var("AGENT_POLL_INTERVAL") {
            config.agent_poll_interval = interval;
        }

        if let Some(interval) = seconds_var("JOB_INDEX_INTERVAL") {
            config.job_index_interval = interval;
        }

        if let Some(interval) = seconds_var("RUN_POLL_INTERVAL") {
            config.run_poll_interval = interval;
        }

        if let Ok(raw) = std::env::var("WATCH_RUNS") {
            config.watch_runs = parse_run_ids(&raw)?;
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.mc_host.is_empty() {
            anyhow::bail!("mc_host cannot be empty");
        }

        if self.mc_host.contains("://") {
            anyhow::bail!("mc_host must be a host name, not a URL");
        }

        if self.mc_token.is_empty() {
            anyhow::bail!("mc_token cannot be empty");
        }

        if self.agent_poll_interval.is_zero() {
            anyhow::bail!("agent_poll_interval must be greater than 0");
        }

        if self.job_index_interval.is_zero() {
            anyhow::bail!("job_index_interval must be greater than 0");
        }

        if self.run_poll_interval.is_zero() {
            anyhow::bail!("run_poll_interval must be greater than 0");
        }

        Ok(())
    }
}

fn seconds_var(name: &str) -> Option<Duration> {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn parse_run_ids(raw: &str) -> anyhow::Result<Vec<RunId>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map(RunId)
                .map_err(|_| anyhow::anyhow!("invalid run id in WATCH_RUNS: {}", s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new("mc.example.com".to_string(), "token".to_string())
    }

    #[test]
    fn test_default_config() {
        let config = config();
        assert_eq!(config.mc_port, 8443);
        assert_eq!(config.agent_poll_interval, Duration::from_secs(10));
        assert_eq!(config.job_index_interval, Duration::from_secs(60));
        assert!(config.watch_runs.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = config();

        config.mc_token = String::new();
        assert!(config.validate().is_err());
        config.mc_token = "token".to_string();

        config.mc_host = "https://mc.example.com".to_string();
        assert!(config.validate().is_err());
        config.mc_host = "mc.example.com".to_string();

        config.agent_poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.agent_poll_interval = Duration::from_secs(1);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_run_ids() {
        assert_eq!(
            parse_run_ids("7, 12,,40").unwrap(),
            vec![RunId(7), RunId(12), RunId(40)]
        );
        assert!(parse_run_ids("7,abc").is_err());
        assert!(parse_run_ids("").unwrap().is_empty());
    }
}
