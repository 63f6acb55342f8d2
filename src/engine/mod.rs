//! The queue engine: snapshot diffing, hourly aggregation, watch decisions and
//! the loop that drives them.

pub mod aggregator;
pub mod clock;
pub mod differ;
pub mod monitor_loop;
pub mod tracker;
pub mod watch_registry;
