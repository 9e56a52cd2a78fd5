//! Service layer
//!
//! Collaborators the scheduler reports into: the property store that caches
//! what the console last said about each agent and job, and the notification
//! sinks that receive membership and run completion events.

mod notify;
mod store;

// Re-export traits
pub use notify::NotificationSink;

// Re-export implementations
pub use notify::LoggingSink;
pub use store::{AGENT_NAME, AGENT_ONLINE, JOB_AGENTS, PropertyStore};
