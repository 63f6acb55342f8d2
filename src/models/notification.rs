//! Notification intents produced by the decision engine.

use serde::Serialize;

use super::{Identifier, SubscriberRef, WatchEntry};

/// Why a notification was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// The vehicle was observed at a new position within the threshold.
    Threshold,
    /// The vehicle reached position 1.
    AtFront,
    /// The vehicle left the queue from position 1.
    Passed,
    /// The vehicle left the queue from another position and never came back.
    TrackingStopped,
}

/// A message that should be delivered to a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationIntent {
    /// Recipient.
    pub subscriber: SubscriberRef,
    /// Vehicle the message is about.
    pub identifier: Identifier,
    /// Reason for the message.
    pub kind: NotificationKind,
    /// Human-readable text.
    pub text: String,
}

impl NotificationIntent {
    fn for_entry(entry: &WatchEntry, kind: NotificationKind, text: String) -> Self {
        Self { subscriber: entry.subscriber.clone(), identifier: entry.identifier.clone(), kind, text }
    }

    /// The vehicle is at `position`, within the watch threshold.
    pub fn threshold(entry: &WatchEntry, position: u32) -> Self {
        let text = format!("ℹ️ {}: position {}.", entry.identifier, position);
        Self::for_entry(entry, NotificationKind::Threshold, text)
    }

    /// The vehicle is at the front of the queue.
    pub fn at_front(entry: &WatchEntry) -> Self {
        let text = format!("🔔 {} is at position 1!", entry.identifier);
        Self::for_entry(entry, NotificationKind::AtFront, text)
    }

    /// The vehicle passed the checkpoint.
    pub fn passed(entry: &WatchEntry) -> Self {
        let text = format!("✅ {} passed the checkpoint (last position: 1).", entry.identifier);
        Self::for_entry(entry, NotificationKind::Passed, text)
    }

    /// The watch was evicted after the vehicle stayed out of the queue.
    pub fn tracking_stopped(entry: &WatchEntry) -> Self {
        let text = match (entry.last_position, entry.missing_since) {
            (Some(position), _) => format!(
                "⚠️ {} left the queue at position {} and did not return. Tracking stopped.",
                entry.identifier, position
            ),
            (None, Some(_)) => {
                format!("⚠️ {} left the queue and did not return. Tracking stopped.", entry.identifier)
            }
            (None, None) => format!("⚠️ {} did not appear in the queue. Tracking stopped.", entry.identifier),
        };
        Self::for_entry(entry, NotificationKind::TrackingStopped, text)
    }
}
