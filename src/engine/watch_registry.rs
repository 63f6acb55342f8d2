//! The watch registry and the notification decision engine.
//!
//! The registry owns every [`WatchEntry`]. Commands create and delete entries;
//! the tracker feeds observed positions and disappearances through
//! [`WatchRegistry::on_observed_position`] and
//! [`WatchRegistry::on_disappeared`], which update the entry and decide which
//! notifications to emit.
//!
//! ## Rules
//!
//! - A position within the threshold is reported at most once per watch,
//!   no matter how many polls re-observe it.
//! - Position 1 additionally produces an "at front" message in the same cycle.
//! - Vanishing from position 1 means the vehicle passed: the subscriber is told
//!   and the watch is removed.
//! - Vanishing from any other position marks the entry as missing. A missing
//!   entry that does not come back within the stale timeout is evicted.
//! - A watch whose vehicle is never observed is evicted once the stale timeout
//!   has passed since it was registered.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use thiserror::Error;

use crate::models::{Identifier, NotificationIntent, SubscriberRef, WatchEntry};

/// Errors returned by registry commands.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatchError {
    /// Thresholds start at 1 (the front of the queue).
    #[error("Threshold must be at least 1, got {0}")]
    InvalidThreshold(u32),
}

/// Mapping from vehicle identifier to its watch.
#[derive(Debug, Default)]
pub struct WatchRegistry {
    entries: HashMap<Identifier, WatchEntry>,
}

impl WatchRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or overwrites the watch for `identifier`.
    ///
    /// Returns the stored entry and the one it replaced, if any. The new entry
    /// starts with no known positions.
    pub fn add(
        &mut self,
        identifier: Identifier,
        subscriber: SubscriberRef,
        threshold: u32,
        now: NaiveDateTime,
    ) -> Result<(&WatchEntry, Option<WatchEntry>), WatchError> {
        if threshold == 0 {
            return Err(WatchError::InvalidThreshold(threshold));
        }
        let entry = WatchEntry::new(identifier.clone(), subscriber, threshold, now);
        let replaced = self.entries.remove(&identifier);
        Ok((self.entries.entry(identifier).or_insert(entry), replaced))
    }

    /// Deletes the watch for `identifier`. Absent identifiers are ignored.
    pub fn remove(&mut self, identifier: &Identifier) -> Option<WatchEntry> {
        self.entries.remove(identifier)
    }

    /// Looks up a watch.
    pub fn get(&self, identifier: &Identifier) -> Option<&WatchEntry> {
        self.entries.get(identifier)
    }

    /// Number of registered watches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is watched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered identifiers in ascending order.
    pub fn identifiers(&self) -> Vec<Identifier> {
        let mut identifiers: Vec<_> = self.entries.keys().cloned().collect();
        identifiers.sort();
        identifiers
    }

    /// Records that `identifier` was seen at `position`.
    pub fn on_observed_position(
        &mut self,
        identifier: &Identifier,
        position: u32,
    ) -> Vec<NotificationIntent> {
        let Some(entry) = self.entries.get_mut(identifier) else {
            return Vec::new();
        };

        entry.last_position = Some(position);
        entry.missing_since = None;

        if position > entry.threshold || entry.reported_positions.contains(&position) {
            return Vec::new();
        }

        entry.last_reported_position = Some(position);
        entry.reported_positions.insert(position);

        let mut intents = vec![NotificationIntent::threshold(entry, position)];
        if position == 1 {
            intents.push(NotificationIntent::at_front(entry));
        }
        intents
    }

    /// Records that `identifier` left the queue.
    pub fn on_disappeared(
        &mut self,
        identifier: &Identifier,
        now: NaiveDateTime,
    ) -> Vec<NotificationIntent> {
        let Some(entry) = self.entries.get_mut(identifier) else {
            return Vec::new();
        };

        if entry.last_position == Some(1) {
            let intent = NotificationIntent::passed(entry);
            self.entries.remove(identifier);
            tracing::info!(identifier = %identifier, "Watched vehicle passed the checkpoint; watch removed.");
            return vec![intent];
        }

        if entry.missing_since.is_none() {
            tracing::debug!(identifier = %identifier, last_position = ?entry.last_position, "Watched vehicle left the queue away from the front.");
            entry.missing_since = Some(now);
        }
        Vec::new()
    }

    /// Removes watches whose vehicle has been missing for at least `timeout`,
    /// or was never observed within `timeout` of registration.
    pub fn evict_stale(&mut self, now: NaiveDateTime, timeout: Duration) -> Vec<NotificationIntent> {
        let mut stale: Vec<Identifier> = self
            .entries
            .values()
            .filter(|entry| match entry.missing_since {
                Some(since) => now - since >= timeout,
                None => entry.last_position.is_none() && now - entry.created_at >= timeout,
            })
            .map(|entry| entry.identifier.clone())
            .collect();
        stale.sort();

        stale
            .iter()
            .filter_map(|identifier| self.entries.remove(identifier))
            .map(|entry| {
                tracing::info!(identifier = %entry.identifier, "Evicting watch for vehicle missing from the queue.");
                NotificationIntent::tracking_stopped(&entry)
            })
            .collect()
    }
}
