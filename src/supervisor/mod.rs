//! The Supervisor module manages the lifecycle of the queue-watch service.
//!
//! The supervisor owns the shared [`QueueTracker`] and the adapters around it,
//! starts the monitor loop and the command API, listens for `SIGINT` /
//! `SIGTERM`, and coordinates graceful shutdown:
//!
//! 1. The cancellation token stops new poll cycles and the HTTP server.
//! 2. The in-flight cycle completes and pending hourly records are written.
//! 3. The statistics sink is flushed.
//!
//! Steps 2 and 3 are bounded by `shutdown_timeout_secs`. If a supervised task
//! panics, the supervisor cancels the others so the process exits cleanly
//! rather than running half-functional.

mod builder;

use std::{sync::Arc, time::Instant};

pub use builder::SupervisorBuilder;
use thiserror::Error;
use tokio::{signal, task::JoinSet};
use tokio_util::sync::CancellationToken;

use crate::{
    config::AppConfig,
    engine::{clock::Clock, monitor_loop::MonitorLoop, tracker::QueueTracker},
    http_server::{self, ApiState},
    notification::NotificationSink,
    persistence::StatisticsSink,
    providers::SnapshotFetcher,
};

/// Represents the set of errors that can occur during the supervisor's
/// operation.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A required configuration was not provided to the `SupervisorBuilder`.
    #[error("Missing configuration for Supervisor")]
    MissingConfig,

    /// A snapshot fetcher was not provided to the `SupervisorBuilder`.
    #[error("Missing snapshot fetcher for Supervisor")]
    MissingFetcher,

    /// A notifier was not provided to the `SupervisorBuilder`.
    #[error("Missing notifier for Supervisor")]
    MissingNotifier,

    /// A statistics sink was not provided to the `SupervisorBuilder`.
    #[error("Missing statistics sink for Supervisor")]
    MissingStatisticsSink,

    /// An error occurred due to an invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// The primary runtime manager for the application.
pub struct Supervisor {
    /// Shared application configuration.
    config: Arc<AppConfig>,

    /// Shared queue state, used by the monitor loop and the command API.
    tracker: Arc<QueueTracker>,

    /// Source of queue snapshots.
    fetcher: Arc<dyn SnapshotFetcher>,

    /// Delivers subscriber notifications.
    notifier: Arc<dyn NotificationSink>,

    /// Durable hourly statistics.
    statistics: Arc<dyn StatisticsSink>,

    /// Wall-clock source for hour bucketing.
    clock: Arc<dyn Clock>,

    /// A token used to signal a graceful shutdown to all supervised tasks.
    cancellation_token: CancellationToken,

    /// A set of all spawned tasks that the supervisor is actively managing.
    join_set: JoinSet<()>,
}

impl Supervisor {
    /// Creates a new Supervisor instance with all its required components.
    ///
    /// This is typically called by the `SupervisorBuilder` after it has
    /// assembled all the necessary dependencies.
    pub fn new(
        config: AppConfig,
        fetcher: Arc<dyn SnapshotFetcher>,
        notifier: Arc<dyn NotificationSink>,
        statistics: Arc<dyn StatisticsSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tracker = Arc::new(QueueTracker::new(config.stale_watch_timeout_secs));
        Self {
            config: Arc::new(config),
            tracker,
            fetcher,
            notifier,
            statistics,
            clock,
            cancellation_token: CancellationToken::new(),
            join_set: JoinSet::new(),
        }
    }

    /// Returns a new `SupervisorBuilder` instance.
    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    /// A handle that stops the supervisor when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    /// The shared queue state.
    pub fn tracker(&self) -> Arc<QueueTracker> {
        Arc::clone(&self.tracker)
    }

    /// Starts all services and blocks until shutdown has completed.
    pub async fn run(mut self) -> Result<(), SupervisorError> {
        let started_at = Instant::now();

        // Spawn a task to listen for shutdown signals.
        let signal_token = self.cancellation_token.clone();
        self.join_set.spawn(async move {
            let ctrl_c = signal::ctrl_c();
            #[cfg(unix)]
            let terminate = async {
                match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(mut sigterm) => {
                        sigterm.recv().await;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to register SIGTERM handler.");
                        std::future::pending::<()>().await;
                    }
                }
            };
            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::info!("SIGINT (Ctrl+C) received, initiating graceful shutdown."),
                _ = terminate => tracing::info!("SIGTERM received, initiating graceful shutdown."),
                _ = signal_token.cancelled() => return,
            }

            // Notify all other tasks to begin shutting down.
            signal_token.cancel();
        });

        // Spawn the HTTP server as a background task if enabled.
        if self.config.server.enabled {
            let state = ApiState {
                config: Arc::clone(&self.config),
                tracker: Arc::clone(&self.tracker),
                statistics: Arc::clone(&self.statistics),
                clock: Arc::clone(&self.clock),
                started_at,
            };
            let http_cancellation_token = self.cancellation_token.clone();
            self.join_set.spawn(async move {
                if let Err(e) = http_server::run_server(state, http_cancellation_token.clone()).await
                {
                    tracing::error!(error = %e, "HTTP server failed. Initiating shutdown.");
                    http_cancellation_token.cancel();
                }
            });
        } else {
            tracing::info!("HTTP server disabled by configuration.");
        }

        // Spawn the monitor loop.
        let monitor_loop = MonitorLoop::new(
            Arc::clone(&self.config),
            Arc::clone(&self.tracker),
            Arc::clone(&self.fetcher),
            Arc::clone(&self.notifier),
            Arc::clone(&self.statistics),
            Arc::clone(&self.clock),
            self.cancellation_token.clone(),
        );
        self.join_set.spawn(monitor_loop.run());

        // --- Main Supervisor Loop ---
        loop {
            tokio::select! {
                maybe_result = self.join_set.join_next() => {
                    match maybe_result {
                        Some(Ok(())) => {}
                        Some(Err(e)) => {
                            tracing::error!("A critical task failed: {:?}. Initiating shutdown.", e);
                            self.cancellation_token.cancel();
                        }
                        None => break,
                    }
                }
                _ = self.cancellation_token.cancelled() => break,
            }
        }

        // --- Graceful Shutdown ---
        let shutdown_timeout = self.config.shutdown_timeout_secs;
        tracing::info!(timeout = ?shutdown_timeout, "Waiting for supervised tasks to finish...");

        let drain = async {
            while let Some(result) = self.join_set.join_next().await {
                if let Err(e) = result {
                    tracing::error!("A task failed during shutdown: {:?}", e);
                }
            }
        };
        if tokio::time::timeout(shutdown_timeout, drain).await.is_err() {
            tracing::warn!(
                "Tasks did not finish within the timeout of {:?}. Aborting the rest.",
                shutdown_timeout
            );
            self.join_set.shutdown().await;
        } else {
            tracing::info!("All supervised tasks have completed.");
        }

        match tokio::time::timeout(shutdown_timeout, self.statistics.flush()).await {
            Ok(Ok(())) => tracing::info!("Statistics flushed."),
            Ok(Err(e)) => tracing::error!(error = %e, "Failed to flush statistics."),
            Err(_) => tracing::warn!("Statistics flush did not complete within {:?}.", shutdown_timeout),
        }

        if let Some((hour, count)) = self.tracker.open_hour().await {
            tracing::info!(hour = %hour, departures = count, "Discarding partial hour at shutdown.");
        }

        tracing::info!("Supervisor shutdown complete.");
        Ok(())
    }
}
