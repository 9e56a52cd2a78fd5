//! Error types for the monitoring engine

use syncwatch_client::ClientError;
use syncwatch_core::domain::agent::AgentId;
use syncwatch_core::domain::job::JobId;
use thiserror::Error;

/// Failures reported by a remote status source
///
/// Both kinds are transient from the scheduler's point of view: they are
/// logged and the affected cycle is skipped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Network, authentication or server failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be decoded or lacked expected fields
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<ClientError> for SourceError {
    fn from(err: ClientError) -> Self {
        if err.is_parse_error() {
            SourceError::Malformed(err.to_string())
        } else {
            SourceError::Transport(err.to_string())
        }
    }
}

/// Errors surfaced to callers of the engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// A schedule was requested with a zero interval
    #[error("polling interval must be greater than zero")]
    InvalidInterval,

    /// Property lookup for an agent that was never observed
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// Property lookup for a job that was never observed
    #[error("unknown job: {0}")]
    UnknownJob(JobId),

    /// The entity is known but the property was never set
    #[error("{entity} has no property '{key}'")]
    UnknownProperty { entity: String, key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_source_errors() {
        let parse = SourceError::from(ClientError::ParseError("missing status".to_string()));
        assert!(matches!(parse, SourceError::Malformed(_)));

        let api = SourceError::from(ClientError::api_error(503, "maintenance"));
        assert!(matches!(api, SourceError::Transport(_)));

        let auth = SourceError::from(ClientError::Unauthorized("bad token".to_string()));
        assert!(matches!(auth, SourceError::Transport(_)));
    }
}
