//! Set difference between consecutive queue snapshots.

use std::collections::HashSet;

use crate::models::{Identifier, Snapshot};

/// Result of comparing the previous identifier set with the current poll.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueDiff {
    /// Identifiers present previously and absent now.
    pub departed: HashSet<Identifier>,
    /// Identifiers absent previously and present now.
    pub appeared: HashSet<Identifier>,
    /// Identifiers present in the current poll.
    pub current: HashSet<Identifier>,
    /// `false` when the current poll produced no snapshot.
    pub available: bool,
}

/// Compares `previous` against the current poll.
///
/// An unavailable poll yields empty sets and `available == false`. The caller
/// keeps its previous set untouched in that case.
pub fn diff(previous: &HashSet<Identifier>, current: Option<&Snapshot>) -> QueueDiff {
    let Some(snapshot) = current else {
        return QueueDiff::default();
    };

    let current = snapshot.identifiers();
    QueueDiff {
        departed: previous.difference(&current).cloned().collect(),
        appeared: current.difference(previous).cloned().collect(),
        current,
        available: true,
    }
}
