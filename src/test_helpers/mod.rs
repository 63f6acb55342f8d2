//! A set of helpers for testing

mod api;
mod clock;
mod fetcher;
mod notifier;
mod queue;
mod statistics;

pub use api::api_state;
pub use clock::ManualClock;
pub use fetcher::ScriptedFetcher;
pub use notifier::RecordingNotifier;
pub use queue::{at, at_on, entry, id, snapshot};
pub use statistics::MemoryStatisticsSink;
