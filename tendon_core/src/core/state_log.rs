//! Append-only log of recorded robot states
//!
//! The only shared growable structure in the core: the tick path appends
//! one snapshot per successful tick, query callers read historical entries
//! by index. Indices are stable (arrival order, starting at 0) and the log
//! is never truncated during a session's lifetime.

use crate::error::{Result, TendonError};
use parking_lot::RwLock;
use std::sync::Arc;
use tendon_types::RobotState;

/// Append-only, index-stable arena of state snapshots.
///
/// Entries are stored behind `Arc` so readers hold a snapshot without
/// keeping the log locked. An append is atomic with respect to readers:
/// a reader sees an entry fully formed or not at all.
pub struct StateLog {
    entries: RwLock<Vec<Arc<RobotState>>>,
}

impl StateLog {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::with_capacity(capacity)),
        }
    }

    /// Append a snapshot, returning its index.
    pub fn append(&self, state: RobotState) -> usize {
        let mut entries = self.entries.write();
        entries.push(Arc::new(state));
        entries.len() - 1
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Fetch the snapshot recorded at `index`.
    pub fn get(&self, index: usize) -> Result<Arc<RobotState>> {
        let entries = self.entries.read();
        entries
            .get(index)
            .cloned()
            .ok_or(TendonError::IndexOutOfRange {
                index,
                len: entries.len(),
            })
    }

    /// The most recently recorded snapshot, if any.
    pub fn latest(&self) -> Option<Arc<RobotState>> {
        self.entries.read().last().cloned()
    }
}

impl Default for StateLog {
    fn default() -> Self {
        Self::new()
    }
}
