use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{Identifier, QueueEntry, Snapshot};

/// Parses an identifier, panicking on empty input.
pub fn id(raw: &str) -> Identifier {
    Identifier::parse(raw).expect("test identifier must not be empty")
}

/// Creates a queue entry.
pub fn entry(raw: &str, position: u32) -> QueueEntry {
    QueueEntry::new(id(raw), position)
}

/// Creates a snapshot from `(identifier, position)` pairs.
pub fn snapshot(entries: &[(&str, u32)]) -> Snapshot {
    Snapshot::from_entries(entries.iter().map(|(raw, position)| entry(raw, *position)))
}

/// 5 March 2025 at `hour:minute`.
pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    at_on(5, hour, minute)
}

/// `day` March 2025 at `hour:minute`.
pub fn at_on(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid test timestamp")
}
