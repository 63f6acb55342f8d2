use async_trait::async_trait;

use super::{NotificationSink, error::NotificationError};
use crate::models::SubscriberRef;

/// A notifier that prints messages to standard output instead of delivering
/// them.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

#[async_trait]
impl NotificationSink for StdoutNotifier {
    async fn notify(&self, subscriber: &SubscriberRef, text: &str) -> Result<(), NotificationError> {
        tracing::info!(subscriber = %subscriber, "Printing notification to stdout.");
        println!("=== Notification for {subscriber} ===\n{text}\n");
        Ok(())
    }
}
