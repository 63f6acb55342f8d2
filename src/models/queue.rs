//! Queue entries and the per-poll snapshot built from them.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::Identifier;

/// A single vehicle waiting in the checkpoint queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueEntry {
    /// Normalized registration number.
    pub identifier: Identifier,
    /// Rank within the live queue, 1 being the front.
    pub position: u32,
}

impl QueueEntry {
    /// Creates a new queue entry.
    pub fn new(identifier: Identifier, position: u32) -> Self {
        Self { identifier, position }
    }
}

/// The identifiers and positions observed by one successful poll.
///
/// A failed poll never produces a `Snapshot`; callers model that case as
/// `Option<Snapshot>::None`, which is distinct from an empty queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    positions: HashMap<Identifier, u32>,
}

impl Snapshot {
    /// Builds a snapshot from fetched entries.
    ///
    /// If the feed lists the same identifier more than once, the first
    /// occurrence wins.
    pub fn from_entries(entries: impl IntoIterator<Item = QueueEntry>) -> Self {
        let mut positions = HashMap::new();
        for entry in entries {
            if positions.contains_key(&entry.identifier) {
                tracing::debug!(identifier = %entry.identifier, "Duplicate identifier in snapshot ignored.");
                continue;
            }
            positions.insert(entry.identifier, entry.position);
        }
        Self { positions }
    }

    /// Number of distinct vehicles in the queue.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the queue was observed to be empty.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of `identifier` in this snapshot, if present.
    pub fn position(&self, identifier: &Identifier) -> Option<u32> {
        self.positions.get(identifier).copied()
    }

    /// Returns `true` if `identifier` is in the queue.
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.positions.contains_key(identifier)
    }

    /// The set of identifiers present in this snapshot.
    pub fn identifiers(&self) -> HashSet<Identifier> {
        self.positions.keys().cloned().collect()
    }
}
