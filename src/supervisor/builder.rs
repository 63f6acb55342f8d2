//! This module provides the `SupervisorBuilder` for constructing a `Supervisor`.

use std::sync::Arc;

use super::{Supervisor, SupervisorError};
use crate::{
    config::AppConfig,
    engine::clock::{Clock, LocalClock},
    notification::NotificationSink,
    persistence::StatisticsSink,
    providers::SnapshotFetcher,
};

/// A builder for creating a `Supervisor` instance.
#[derive(Default)]
pub struct SupervisorBuilder {
    config: Option<AppConfig>,
    fetcher: Option<Arc<dyn SnapshotFetcher>>,
    notifier: Option<Arc<dyn NotificationSink>>,
    statistics: Option<Arc<dyn StatisticsSink>>,
    clock: Option<Arc<dyn Clock>>,
}

impl SupervisorBuilder {
    /// Creates a new, empty `SupervisorBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application configuration for the `Supervisor`.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the snapshot fetcher.
    pub fn fetcher(mut self, fetcher: Arc<dyn SnapshotFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Sets the notification sink.
    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Sets the statistics sink.
    pub fn statistics(mut self, statistics: Arc<dyn StatisticsSink>) -> Self {
        self.statistics = Some(statistics);
        self
    }

    /// Overrides the wall clock. Defaults to [`LocalClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validates the components and builds a `Supervisor`.
    pub fn build(self) -> Result<Supervisor, SupervisorError> {
        let config = self.config.ok_or(SupervisorError::MissingConfig)?;
        let fetcher = self.fetcher.ok_or(SupervisorError::MissingFetcher)?;
        let notifier = self.notifier.ok_or(SupervisorError::MissingNotifier)?;
        let statistics = self.statistics.ok_or(SupervisorError::MissingStatisticsSink)?;
        let clock = self.clock.unwrap_or_else(|| Arc::new(LocalClock));

        if config.polling_interval_secs.is_zero() {
            return Err(SupervisorError::InvalidConfiguration(
                "polling_interval_secs must be greater than zero".to_string(),
            ));
        }
        if config.checkpoint_url.trim().is_empty() {
            return Err(SupervisorError::InvalidConfiguration(
                "checkpoint_url must not be empty".to_string(),
            ));
        }

        tracing::debug!(
            polling_interval = ?config.polling_interval_secs,
            stale_watch_timeout = ?config.stale_watch_timeout_secs,
            "Supervisor components assembled."
        );

        Ok(Supervisor::new(config, fetcher, notifier, statistics, clock))
    }
}
