use std::time::Duration;

use serde::Deserialize;

use super::{HttpRetryConfig, deserialize_duration_from_seconds};

/// Which notification sink delivers subscriber messages.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Log messages locally instead of delivering them.
    #[default]
    Stdout,
    /// Deliver messages through the Telegram Bot API.
    Telegram,
}

/// Telegram Bot API settings.
#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    /// Bot token. Falls back to the `QUEUE_WATCH_TELEGRAM_TOKEN` env var.
    #[serde(default = "default_token_from_env")]
    pub token: Option<String>,

    /// Base URL of the Bot API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Connect timeout of the HTTP client.
    #[serde(
        default = "default_connect_timeout",
        deserialize_with = "deserialize_duration_from_seconds"
    )]
    pub connect_timeout_secs: Duration,

    /// Retry policy for transient delivery failures.
    #[serde(default)]
    pub retry_policy: HttpRetryConfig,
}

fn default_token_from_env() -> Option<String> {
    std::env::var("QUEUE_WATCH_TELEGRAM_TOKEN").ok()
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base_url: default_api_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            retry_policy: HttpRetryConfig::default(),
        }
    }
}
