//! The monitor loop drives the tracker from periodic snapshot fetches.
//!
//! Each cycle fetches a snapshot outside the tracker lock, applies it through
//! [`QueueTracker::apply_cycle`], then delivers the resulting notifications
//! and hourly record, again outside the lock.

use std::{any::Any, collections::VecDeque, panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures::FutureExt;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::{
    aggregator::AggregatorError,
    clock::Clock,
    tracker::{CycleOutcome, QueueTracker},
};
use crate::{
    config::AppConfig,
    models::{FinalizedHourRecord, NotificationIntent, Snapshot},
    notification::NotificationSink,
    persistence::StatisticsSink,
    providers::SnapshotFetcher,
};

/// Errors that abort a single cycle.
#[derive(Debug, Error)]
pub enum MonitorLoopError {
    /// The tracker rejected the cycle.
    #[error("Aggregator error: {0}")]
    Aggregator(#[from] AggregatorError),

    /// A fetcher, sink or the tracker panicked while the cycle ran.
    #[error("Poll cycle panicked: {0}")]
    Panicked(String),
}

/// The polling service.
pub struct MonitorLoop<
    F: SnapshotFetcher + ?Sized,
    N: NotificationSink + ?Sized,
    S: StatisticsSink + ?Sized,
    C: Clock + ?Sized,
> {
    /// Shared application configuration.
    config: Arc<AppConfig>,
    /// Shared queue state.
    tracker: Arc<QueueTracker>,
    /// Source of queue snapshots.
    fetcher: Arc<F>,
    /// Delivers subscriber notifications.
    notifier: Arc<N>,
    /// Receives finalized hourly records.
    statistics: Arc<S>,
    /// Wall-clock source for hour bucketing.
    clock: Arc<C>,
    /// Finalized records not yet written, oldest first.
    pending_records: Mutex<VecDeque<FinalizedHourRecord>>,
    /// A token used to signal a graceful shutdown.
    cancellation_token: CancellationToken,
}

impl<F, N, S, C> MonitorLoop<F, N, S, C>
where
    F: SnapshotFetcher + ?Sized,
    N: NotificationSink + ?Sized,
    S: StatisticsSink + ?Sized,
    C: Clock + ?Sized,
{
    /// Creates a new monitor loop.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<AppConfig>,
        tracker: Arc<QueueTracker>,
        fetcher: Arc<F>,
        notifier: Arc<N>,
        statistics: Arc<S>,
        clock: Arc<C>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            config,
            tracker,
            fetcher,
            notifier,
            statistics,
            clock,
            pending_records: Mutex::new(VecDeque::new()),
            cancellation_token,
        }
    }

    /// Starts the long-running service loop.
    ///
    /// The first cycle runs immediately. The loop only ends on cancellation;
    /// a cycle in progress at that moment is allowed to finish.
    pub async fn run(self) {
        tracing::info!(
            interval = ?self.config.polling_interval_secs,
            checkpoint_url = %self.config.checkpoint_url,
            "Monitor loop started."
        );
        let mut delay = Duration::ZERO;

        loop {
            let polling_delay = tokio::time::sleep(delay);

            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Monitor loop cancellation signal received, shutting down...");
                    break;
                }

                _ = polling_delay => {
                    delay = match self.run_guarded_cycle().await {
                        Ok(_) => self.config.polling_interval_secs,
                        Err(e) => {
                            tracing::error!(error = %e, "Error during poll cycle. Retrying after backoff...");
                            self.config.error_backoff_secs
                        }
                    };
                }
            }
        }

        self.write_pending_records().await;
        tracing::info!("Monitor loop has shut down.");
    }

    /// Performs one poll cycle and returns what it produced.
    pub async fn run_cycle(&self) -> Result<CycleOutcome, MonitorLoopError> {
        let snapshot = self.fetch_snapshot().await;
        let now = self.clock.now();

        let outcome = self.tracker.apply_cycle(snapshot, now).await?;
        tracing::debug!(
            departed = outcome.departed,
            queue_size = ?outcome.queue_size,
            notifications = outcome.notifications.len(),
            "Poll cycle applied."
        );

        self.dispatch_notifications(&outcome.notifications).await;

        if let Some(record) = &outcome.finalized {
            tracing::info!(record = %record, "Hour finalized.");
            self.pending_records.lock().await.push_back(record.clone());
        }
        self.write_pending_records().await;

        Ok(outcome)
    }

    /// Runs one cycle, turning a panic into [`MonitorLoopError::Panicked`] so
    /// the loop survives it.
    async fn run_guarded_cycle(&self) -> Result<CycleOutcome, MonitorLoopError> {
        AssertUnwindSafe(self.run_cycle())
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(MonitorLoopError::Panicked(panic_message(payload.as_ref()))))
    }

    async fn fetch_snapshot(&self) -> Option<Snapshot> {
        match tokio::time::timeout(self.config.fetch_timeout_secs, self.fetcher.fetch()).await {
            Ok(Ok(entries)) => Some(Snapshot::from_entries(entries)),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Snapshot fetch failed, treating cycle as no data.");
                None
            }
            Err(_) => {
                tracing::warn!(
                    timeout = ?self.config.fetch_timeout_secs,
                    "Snapshot fetch timed out, treating cycle as no data."
                );
                None
            }
        }
    }

    /// Sends intents one at a time, in emission order. Failures are logged and
    /// not retried.
    async fn dispatch_notifications(&self, intents: &[NotificationIntent]) {
        for intent in intents {
            let delivery = self.notifier.notify(&intent.subscriber, &intent.text);
            match tokio::time::timeout(self.config.notify_timeout_secs, delivery).await {
                Ok(Ok(())) => {
                    tracing::debug!(identifier = %intent.identifier, kind = ?intent.kind, "Notification delivered.");
                }
                Ok(Err(e)) => {
                    tracing::error!(identifier = %intent.identifier, subscriber = %intent.subscriber, error = %e, "Failed to deliver notification.");
                }
                Err(_) => {
                    tracing::error!(identifier = %intent.identifier, subscriber = %intent.subscriber, "Notification delivery timed out.");
                }
            }
        }
    }

    /// Writes queued records in order, stopping at the first failure so later
    /// hours are never written before earlier ones.
    async fn write_pending_records(&self) {
        let mut pending = self.pending_records.lock().await;
        while let Some(record) = pending.front() {
            if let Err(e) = self.statistics.append(record).await {
                tracing::error!(record = %record, pending = pending.len(), error = %e, "Failed to write hourly record, will retry.");
                return;
            }
            pending.pop_front();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
