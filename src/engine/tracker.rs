//! The queue tracker: the single ownership boundary for shared queue state.
//!
//! [`QueueTracker`] keeps the previous-seen identifier set, the hourly
//! aggregator, the watch registry and the last known queue size behind one
//! async mutex. The monitor loop applies poll results through
//! [`QueueTracker::apply_cycle`]; the command surface goes through the
//! `add_watch` / `remove_watch` / `query_current_count` methods. Every method
//! holds the lock for a short, I/O-free critical section.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tokio::sync::Mutex;

use super::{
    aggregator::{AggregatorError, HourlyAggregator},
    differ,
    watch_registry::{WatchError, WatchRegistry},
};
use crate::models::{
    FinalizedHourRecord, HourKey, Identifier, NotificationIntent, Snapshot, SubscriberRef,
    WatchEntry,
};

/// Everything one poll cycle produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Notifications to dispatch, in emission order.
    pub notifications: Vec<NotificationIntent>,
    /// The record of the hour that closed during this cycle, if any.
    pub finalized: Option<FinalizedHourRecord>,
    /// Number of vehicles that left the queue since the previous successful poll.
    pub departed: usize,
    /// Queue size, or `None` when the poll failed.
    pub queue_size: Option<usize>,
}

/// Result of registering a watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchAdded {
    /// The entry as stored.
    pub watch: WatchEntry,
    /// The entry it overwrote, if any.
    pub replaced: Option<WatchEntry>,
}

/// The last known aggregate queue size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueCount {
    /// Number of vehicles in the queue, `None` if the last poll failed.
    pub count: Option<usize>,
    /// When the last poll (successful or not) was applied.
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Default)]
struct TrackerState {
    previous_seen: HashSet<Identifier>,
    aggregator: HourlyAggregator,
    registry: WatchRegistry,
    queue_count: QueueCount,
    last_cycle_at: Option<NaiveDateTime>,
}

/// Shared queue state, safe to use from the monitor loop and the command API
/// concurrently.
#[derive(Debug)]
pub struct QueueTracker {
    state: Mutex<TrackerState>,
    stale_watch_timeout: Duration,
}

impl QueueTracker {
    /// Creates a tracker. Watches whose vehicle stays out of the queue for
    /// `stale_watch_timeout` are evicted.
    pub fn new(stale_watch_timeout: std::time::Duration) -> Self {
        let stale_watch_timeout =
            Duration::from_std(stale_watch_timeout).unwrap_or_else(|_| Duration::weeks(52 * 100));
        Self { state: Mutex::new(TrackerState::default()), stale_watch_timeout }
    }

    /// Applies one poll result.
    ///
    /// `snapshot` is `None` when the fetch failed: the departure diff is
    /// skipped, the previous-seen set is kept for the next attempt and the
    /// queue size becomes unknown. The hour still advances so rollovers are
    /// not delayed by an outage.
    pub async fn apply_cycle(
        &self,
        snapshot: Option<Snapshot>,
        now: NaiveDateTime,
    ) -> Result<CycleOutcome, AggregatorError> {
        let mut state = self.state.lock().await;

        // Hour boundaries only move forward.
        let now = match state.last_cycle_at {
            Some(last) if now < last => last,
            _ => now,
        };
        state.last_cycle_at = Some(now);

        let diff = differ::diff(&state.previous_seen, snapshot.as_ref());
        let queue_size = snapshot.as_ref().map(Snapshot::len);
        if diff.available {
            tracing::debug!(departed = diff.departed.len(), appeared = diff.appeared.len(), queue_size = ?queue_size, "Queue diff computed.");
            state.previous_seen = diff.current;
        }
        state.queue_count = QueueCount { count: queue_size, updated_at: Some(now) };

        let mut notifications = Vec::new();
        let mut departed: Vec<&Identifier> = diff.departed.iter().collect();
        departed.sort();
        for identifier in departed {
            notifications.extend(state.registry.on_disappeared(identifier, now));
        }

        let finalized = state.aggregator.tick(now);
        state.aggregator.record_departure(diff.departed.len() as u64, now)?;

        if let Some(snapshot) = &snapshot {
            for identifier in state.registry.identifiers() {
                if let Some(position) = snapshot.position(&identifier) {
                    notifications.extend(state.registry.on_observed_position(&identifier, position));
                }
            }
        }

        let stale_watch_timeout = self.stale_watch_timeout;
        notifications.extend(state.registry.evict_stale(now, stale_watch_timeout));

        Ok(CycleOutcome { notifications, finalized, departed: diff.departed.len(), queue_size })
    }

    /// Registers (or replaces) a watch. Returns the replaced entry.
    pub async fn add_watch(
        &self,
        identifier: Identifier,
        threshold: u32,
        subscriber: SubscriberRef,
        now: NaiveDateTime,
    ) -> Result<WatchAdded, WatchError> {
        let mut state = self.state.lock().await;
        let (stored, replaced) = state.registry.add(identifier, subscriber, threshold, now)?;
        Ok(WatchAdded { watch: stored.clone(), replaced })
    }

    /// Removes a watch. Returns `true` if one existed.
    pub async fn remove_watch(&self, identifier: &Identifier) -> bool {
        self.state.lock().await.registry.remove(identifier).is_some()
    }

    /// The last known queue size.
    pub async fn query_current_count(&self) -> QueueCount {
        self.state.lock().await.queue_count
    }

    /// A copy of the watch for `identifier`.
    pub async fn watch(&self, identifier: &Identifier) -> Option<WatchEntry> {
        self.state.lock().await.registry.get(identifier).cloned()
    }

    /// Number of registered watches.
    pub async fn watch_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    /// The currently open hour and the departures counted in it so far.
    pub async fn open_hour(&self) -> Option<(HourKey, u64)> {
        self.state.lock().await.aggregator.open_bucket()
    }
}
