//! Data models shared by the tracker, the adapters and the HTTP API.

pub mod hour;
pub mod identifier;
pub mod notification;
pub mod queue;
pub mod report;
pub mod watch;

pub use hour::{FinalizedHourRecord, HourKey, RecordParseError, parse_record_date};
pub use identifier::{Identifier, IdentifierError};
pub use notification::{NotificationIntent, NotificationKind};
pub use queue::{QueueEntry, Snapshot};
pub use report::{DayStatistics, HourCount, StatisticsReport};
pub use watch::{SubscriberRef, WatchEntry};
