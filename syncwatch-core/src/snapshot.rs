//! Snapshot diffing
//!
//! A snapshot is the set of agent ids the console reported at one point in
//! time. Successive snapshots are compared with a symmetric difference.

use std::collections::HashSet;
use std::hash::Hash;

use crate::domain::agent::AgentId;

/// Set of agent ids observed in one query cycle
pub type AgentSet = HashSet<AgentId>;

/// Returns the ids present in exactly one of the two sets
///
/// Membership is checked through the hash index of each set, so the cost is
/// linear in the combined size.
pub fn diff<T>(current: &HashSet<T>, previous: &HashSet<T>) -> HashSet<T>
where
    T: Eq + Hash + Clone,
{
    current.symmetric_difference(previous).cloned().collect()
}
