//! # Notification Service
//!
//! Delivers subscriber messages produced by the queue tracker.
//!
//! The [`NotificationSink`] trait is the seam between the monitor loop and a
//! concrete channel. [`TelegramNotifier`] sends messages through the Telegram
//! Bot API; [`StdoutNotifier`] prints them, which is handy for local runs and
//! for the `poll-once` command. [`create_notifier`] picks one from the
//! application configuration.

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::{
    config::{AppConfig, NotifierKind},
    models::SubscriberRef,
};

pub mod error;
mod stdout;
mod telegram;

pub use error::NotificationError;
pub use stdout::StdoutNotifier;
pub use telegram::TelegramNotifier;

/// A channel that delivers a text message to one subscriber.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers `text` to `subscriber`.
    async fn notify(&self, subscriber: &SubscriberRef, text: &str) -> Result<(), NotificationError>;
}

/// Builds the notifier selected by `config.notifier`.
pub fn create_notifier(config: &AppConfig) -> Result<Arc<dyn NotificationSink>, NotificationError> {
    match config.notifier {
        NotifierKind::Stdout => Ok(Arc::new(StdoutNotifier)),
        NotifierKind::Telegram => {
            let notifier = TelegramNotifier::new(&config.telegram, config.notify_timeout_secs)?;
            tracing::info!(api_base_url = %config.telegram.api_base_url, "Telegram notifier configured.");
            Ok(Arc::new(notifier))
        }
    }
}
