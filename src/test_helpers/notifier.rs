use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    models::SubscriberRef,
    notification::{NotificationError, NotificationSink},
};

/// A notifier that remembers every message it was asked to deliver.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(SubscriberRef, String)>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivered `(subscriber, text)` pairs in delivery order.
    pub async fn sent(&self) -> Vec<(SubscriberRef, String)> {
        self.sent.lock().await.clone()
    }

    /// Texts delivered to `subscriber`, in order.
    pub async fn texts_for(&self, subscriber: &str) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|(to, _)| to.as_str() == subscriber)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, subscriber: &SubscriberRef, text: &str) -> Result<(), NotificationError> {
        self.sent.lock().await.push((subscriber.clone(), text.to_string()));
        Ok(())
    }
}
