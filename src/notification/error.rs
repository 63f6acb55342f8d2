//! Error types for the notification sinks.

use thiserror::Error;

use crate::http_client::HttpClientError;

/// Defines the possible errors that can occur while delivering a
/// notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// An error related to invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The provider rejected the notification.
    #[error("Notification failed: {0}")]
    NotifyFailed(String),

    /// The notifier's HTTP client could not be created.
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] HttpClientError),

    /// An error from the underlying `reqwest` or `reqwest_middleware`
    /// libraries.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest_middleware::Error),

    /// The provider URL could not be built.
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}
