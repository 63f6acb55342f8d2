//! One-shot command line tools that run outside the supervisor.

pub mod poll_once;
pub mod stats;

pub use poll_once::PollOnceArgs;
pub use stats::StatsArgs;
