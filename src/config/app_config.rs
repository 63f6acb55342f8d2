use std::{path::PathBuf, time::Duration};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::{
    NotifierKind, ServerConfig, TelegramConfig, deserialize_duration_from_seconds,
};

fn default_polling_interval() -> Duration {
    Duration::from_secs(30)
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_notify_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_error_backoff() -> Duration {
    Duration::from_secs(10)
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_stale_watch_timeout() -> Duration {
    Duration::from_secs(6 * 60 * 60)
}

fn default_statistics_path() -> PathBuf {
    PathBuf::from("statistic.txt")
}

/// Application configuration for queue-watch.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// URL of the checkpoint's live queue endpoint.
    pub checkpoint_url: String,

    /// Interval between two poll cycles.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_polling_interval"
    )]
    pub polling_interval_secs: Duration,

    /// Upper bound for one snapshot fetch.
    #[serde(deserialize_with = "deserialize_duration_from_seconds", default = "default_fetch_timeout")]
    pub fetch_timeout_secs: Duration,

    /// Upper bound for delivering one notification.
    #[serde(deserialize_with = "deserialize_duration_from_seconds", default = "default_notify_timeout")]
    pub notify_timeout_secs: Duration,

    /// Delay before the next cycle after a cycle failed unexpectedly.
    #[serde(deserialize_with = "deserialize_duration_from_seconds", default = "default_error_backoff")]
    pub error_backoff_secs: Duration,

    /// The maximum time to wait for graceful shutdown.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_shutdown_timeout"
    )]
    pub shutdown_timeout_secs: Duration,

    /// How long a watched vehicle may be missing from the queue (away from the
    /// front) before its watch is evicted.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_stale_watch_timeout"
    )]
    pub stale_watch_timeout_secs: Duration,

    /// Append-only file receiving finalized hourly records.
    #[serde(default = "default_statistics_path")]
    pub statistics_path: PathBuf,

    /// Which notification sink to use.
    #[serde(default)]
    pub notifier: NotifierKind,

    /// Telegram settings, used when `notifier` is `telegram`.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Command API server configuration.
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            checkpoint_url: String::new(),
            polling_interval_secs: default_polling_interval(),
            fetch_timeout_secs: default_fetch_timeout(),
            notify_timeout_secs: default_notify_timeout(),
            error_backoff_secs: default_error_backoff(),
            shutdown_timeout_secs: default_shutdown_timeout(),
            stale_watch_timeout_secs: default_stale_watch_timeout(),
            statistics_path: default_statistics_path(),
            notifier: NotifierKind::default(),
            telegram: TelegramConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading `app.yaml` from the configuration
    /// directory (default `configs`), overridden by `QUEUE_WATCH__*`
    /// environment variables.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir = config_dir.unwrap_or("configs");
        let settings = Config::builder()
            .add_source(File::with_name(&format!("{config_dir}/app.yaml")))
            .add_source(Environment::with_prefix("QUEUE_WATCH").separator("__"))
            .build()?;
        settings.try_deserialize()
    }

    /// Creates a new `AppConfigBuilder`, mainly for tests.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// A builder for creating `AppConfig` instances in tests and tools.
#[derive(Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Sets the checkpoint URL.
    pub fn checkpoint_url(mut self, url: &str) -> Self {
        self.config.checkpoint_url = url.to_string();
        self
    }

    /// Sets the polling interval.
    pub fn polling_interval(mut self, interval: Duration) -> Self {
        self.config.polling_interval_secs = interval;
        self
    }

    /// Sets the fetch timeout.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.fetch_timeout_secs = timeout;
        self
    }

    /// Sets the notification timeout.
    pub fn notify_timeout(mut self, timeout: Duration) -> Self {
        self.config.notify_timeout_secs = timeout;
        self
    }

    /// Sets the backoff after a failed cycle.
    pub fn error_backoff(mut self, backoff: Duration) -> Self {
        self.config.error_backoff_secs = backoff;
        self
    }

    /// Sets the shutdown timeout.
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config.shutdown_timeout_secs = timeout;
        self
    }

    /// Sets the stale watch timeout.
    pub fn stale_watch_timeout(mut self, timeout: Duration) -> Self {
        self.config.stale_watch_timeout_secs = timeout;
        self
    }

    /// Sets the statistics file path.
    pub fn statistics_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.statistics_path = path.into();
        self
    }

    /// Replaces the server configuration.
    pub fn server(mut self, server: ServerConfig) -> Self {
        self.config.server = server;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> AppConfig {
        self.config
    }
}
