//! Correlation ids for feed calls and subscriptions.
//!
//! Every outgoing call and the subscription itself carry an [`Id`]. Ids come
//! from an [`IdGenerator`], which is scoped to whoever holds it: by default a
//! feed session creates its own, and tests inject one with a known starting
//! point.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Correlation id tying a call to its response, or naming a feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub i64);

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing id source.
///
/// Clones share one counter, so ids drawn from any clone are pairwise
/// distinct.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: Arc<AtomicI64>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Generator whose first id is 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Generator whose first id is `first`.
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: Arc::new(AtomicI64::new(first)),
        }
    }

    /// Draws the next id.
    pub fn next_id(&self) -> Id {
        Id(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
