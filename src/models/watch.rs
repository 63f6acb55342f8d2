//! Watch entries: a subscriber's interest in one vehicle's position.

use std::{collections::BTreeSet, fmt};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Identifier;

/// Opaque reference to whoever should receive notifications for a watch
/// (for Telegram, the chat id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriberRef(String);

impl SubscriberRef {
    /// Wraps a raw subscriber reference.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered watch on one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchEntry {
    /// The watched vehicle.
    pub identifier: Identifier,

    /// Who receives notifications.
    pub subscriber: SubscriberRef,

    /// Positions at or below this value are reported. Always `>= 1`.
    pub threshold: u32,

    /// Position seen in the most recent snapshot containing the vehicle.
    pub last_position: Option<u32>,

    /// Position most recently reported to the subscriber.
    pub last_reported_position: Option<u32>,

    /// Every position already reported; a position is never reported twice.
    pub reported_positions: BTreeSet<u32>,

    /// When the watch was registered.
    pub created_at: NaiveDateTime,

    /// Set when the vehicle vanished from a position other than the front.
    pub missing_since: Option<NaiveDateTime>,
}

impl WatchEntry {
    /// Creates a watch with no known positions.
    pub fn new(
        identifier: Identifier,
        subscriber: SubscriberRef,
        threshold: u32,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            identifier,
            subscriber,
            threshold,
            last_position: None,
            last_reported_position: None,
            reported_positions: BTreeSet::new(),
            created_at,
            missing_since: None,
        }
    }
}
