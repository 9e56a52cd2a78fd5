//! Repository layer
//!
//! Repositories are the remote status sources the scheduler polls. They
//! wrap the Management Console client and translate its errors into
//! [`SourceError`](crate::error::SourceError) without any business logic.
//!
//! All repositories are trait-based so the scheduler can be driven by
//! scripted sources in tests.

mod agents;
mod jobs;
mod runs;

// Re-export traits
pub use agents::AgentSource;
pub use jobs::JobSource;
pub use runs::RunStatusSource;

// Re-export implementations
pub use agents::HttpAgentSource;
pub use jobs::HttpJobSource;
pub use runs::HttpRunStatusSource;
