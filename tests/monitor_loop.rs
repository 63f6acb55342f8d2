use std::{sync::Arc, time::Duration};

use queue_watch::{
    config::AppConfig,
    engine::{monitor_loop::MonitorLoop, tracker::QueueTracker},
    models::SubscriberRef,
    providers::FetchError,
    test_helpers::{
        ManualClock, MemoryStatisticsSink, RecordingNotifier, ScriptedFetcher, at, at_on, entry, id,
    },
};
use tokio_util::sync::CancellationToken;

struct Harness {
    tracker: Arc<QueueTracker>,
    notifier: Arc<RecordingNotifier>,
    statistics: Arc<MemoryStatisticsSink>,
    clock: Arc<ManualClock>,
    monitor: MonitorLoop<ScriptedFetcher, RecordingNotifier, MemoryStatisticsSink, ManualClock>,
}

fn harness(fetcher: ScriptedFetcher, config: AppConfig) -> Harness {
    let config = Arc::new(config);
    let tracker = Arc::new(QueueTracker::new(config.stale_watch_timeout_secs));
    let notifier = Arc::new(RecordingNotifier::new());
    let statistics = Arc::new(MemoryStatisticsSink::new());
    let clock = Arc::new(ManualClock::new(at(10, 5)));
    let monitor = MonitorLoop::new(
        config,
        tracker.clone(),
        Arc::new(fetcher),
        notifier.clone(),
        statistics.clone(),
        clock.clone(),
        CancellationToken::new(),
    );
    Harness { tracker, notifier, statistics, clock, monitor }
}

fn config() -> AppConfig {
    AppConfig::builder()
        .checkpoint_url("http://localhost/queue")
        .fetch_timeout(Duration::from_secs(1))
        .notify_timeout(Duration::from_secs(1))
        .build()
}

#[tokio::test]
async fn front_vehicle_passes_and_follower_is_notified() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(vec![entry("A", 1), entry("B", 2)]),
        Ok(vec![entry("B", 1)]),
    ]);
    let h = harness(fetcher, config());
    h.tracker.add_watch(id("A"), 1, SubscriberRef::new("alice"), at(10, 0)).await.unwrap();
    h.tracker.add_watch(id("B"), 5, SubscriberRef::new("bob"), at(10, 0)).await.unwrap();

    h.monitor.run_cycle().await.unwrap();
    h.clock.set(at(10, 6));
    let second = h.monitor.run_cycle().await.unwrap();

    assert_eq!(second.departed, 1);
    assert_eq!(
        h.notifier.texts_for("alice").await,
        vec![
            "ℹ️ A: position 1.".to_string(),
            "🔔 A is at position 1!".to_string(),
            "✅ A passed the checkpoint (last position: 1).".to_string(),
        ]
    );
    assert_eq!(
        h.notifier.texts_for("bob").await,
        vec![
            "ℹ️ B: position 2.".to_string(),
            "ℹ️ B: position 1.".to_string(),
            "🔔 B is at position 1!".to_string(),
        ]
    );
    assert!(h.tracker.watch(&id("A")).await.is_none());
    assert!(h.tracker.watch(&id("B")).await.is_some());
}

#[tokio::test]
async fn outage_between_identical_snapshots_counts_no_departures() {
    let queue = vec![entry("A", 1), entry("B", 2), entry("C", 3)];
    let fetcher = ScriptedFetcher::new(vec![
        Ok(queue.clone()),
        Err(FetchError::Timeout(Duration::from_secs(20))),
        Ok(queue),
    ]);
    let h = harness(fetcher, config());

    h.monitor.run_cycle().await.unwrap();
    h.clock.set(at(10, 6));
    let failed = h.monitor.run_cycle().await.unwrap();
    assert_eq!(failed.queue_size, None);
    h.clock.set(at(10, 7));
    let recovered = h.monitor.run_cycle().await.unwrap();

    assert_eq!(recovered.departed, 0);
    assert_eq!(h.tracker.query_current_count().await.count, Some(3));

    h.clock.set(at(11, 0));
    let rollover = h.monitor.run_cycle().await.unwrap();
    assert_eq!(rollover.finalized.map(|record| record.count), Some(0));
}

#[tokio::test]
async fn hourly_records_are_written_in_order_across_midnight() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(vec![entry("A", 1), entry("B", 2), entry("C", 3)]),
        Ok(vec![entry("C", 1)]),
        Ok(vec![entry("C", 1), entry("D", 2)]),
        Ok(vec![entry("D", 1)]),
    ]);
    let h = harness(fetcher, config());

    h.clock.set(at_on(5, 23, 10));
    h.monitor.run_cycle().await.unwrap();
    h.clock.set(at_on(5, 23, 40));
    h.monitor.run_cycle().await.unwrap();
    h.clock.set(at_on(6, 0, 5));
    h.monitor.run_cycle().await.unwrap();
    h.clock.set(at_on(6, 1, 0));
    h.monitor.run_cycle().await.unwrap();

    let lines: Vec<String> =
        h.statistics.records().await.iter().map(ToString::to_string).collect();
    assert_eq!(lines, vec!["05.03.2025 23-00 2".to_string(), "06.03.2025 00-01 0".to_string()]);
}

#[tokio::test]
async fn same_hour_ticks_write_nothing() {
    let fetcher = ScriptedFetcher::new(vec![Ok(vec![entry("A", 1)])]);
    let h = harness(fetcher, config());

    for minute in [5, 20, 40, 59] {
        h.clock.set(at(10, minute));
        h.monitor.run_cycle().await.unwrap();
    }

    assert!(h.statistics.records().await.is_empty());
}

#[tokio::test]
async fn watch_is_evicted_after_vehicle_stays_away() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(vec![entry("X", 1), entry("A", 2)]),
        Ok(vec![entry("X", 1)]),
    ]);
    let config = AppConfig::builder()
        .checkpoint_url("http://localhost/queue")
        .stale_watch_timeout(Duration::from_secs(30 * 60))
        .build();
    let h = harness(fetcher, config);
    h.tracker.add_watch(id("A"), 1, SubscriberRef::new("alice"), at(10, 0)).await.unwrap();

    h.monitor.run_cycle().await.unwrap();
    h.clock.set(at(10, 10));
    h.monitor.run_cycle().await.unwrap();
    assert!(h.tracker.watch(&id("A")).await.is_some());

    h.clock.set(at(10, 45));
    h.monitor.run_cycle().await.unwrap();

    assert!(h.tracker.watch(&id("A")).await.is_none());
    assert_eq!(
        h.notifier.texts_for("alice").await,
        vec!["⚠️ A left the queue at position 2 and did not return. Tracking stopped.".to_string()]
    );
}
