//! Configuration module for queue-watch.

mod app_config;
mod helpers;
mod http_retry;
mod notifier;
mod server;

pub use app_config::{AppConfig, AppConfigBuilder};
pub use helpers::{
    deserialize_duration_from_ms, deserialize_duration_from_seconds, serialize_duration_to_ms,
    serialize_duration_to_seconds,
};
pub use http_retry::{HttpRetryConfig, JitterSetting};
pub use notifier::{NotifierKind, TelegramConfig};
pub use server::ServerConfig;
