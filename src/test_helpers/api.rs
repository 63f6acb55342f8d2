use std::{sync::Arc, time::Instant};

use super::{ManualClock, MemoryStatisticsSink, at};
use crate::{config::AppConfig, engine::tracker::QueueTracker, http_server::ApiState};

/// Builds API state around `config` with an in-memory statistics sink and a
/// clock fixed at 5 March 2025 10:00. Returns the sink for seeding.
pub fn api_state(config: AppConfig) -> (ApiState, Arc<MemoryStatisticsSink>) {
    let statistics = Arc::new(MemoryStatisticsSink::new());
    let state = ApiState {
        tracker: Arc::new(QueueTracker::new(config.stale_watch_timeout_secs)),
        config: Arc::new(config),
        statistics: statistics.clone(),
        clock: Arc::new(ManualClock::new(at(10, 0))),
        started_at: Instant::now(),
    };
    (state, statistics)
}
