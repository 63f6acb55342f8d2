//! Telegram Bot API notifier.
//!
//! Sends plain-text messages with `sendMessage`; the subscriber reference is
//! the Telegram chat id.

use std::time::Duration;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde_json::json;
use url::Url;

use super::{NotificationSink, error::NotificationError};
use crate::{
    config::TelegramConfig, http_client::create_retryable_http_client, models::SubscriberRef,
};

/// Delivers notifications to Telegram chats.
#[derive(Debug)]
pub struct TelegramNotifier {
    /// Full `.../bot<token>/sendMessage` endpoint.
    send_message_url: Url,
    /// HTTP client with retry middleware.
    client: ClientWithMiddleware,
}

impl TelegramNotifier {
    /// Creates a notifier from the Telegram configuration.
    ///
    /// `request_timeout` bounds each HTTP attempt.
    pub fn new(config: &TelegramConfig, request_timeout: Duration) -> Result<Self, NotificationError> {
        let token = config
            .token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| NotificationError::ConfigError("Telegram bot token is not set".to_string()))?;

        let base = config.api_base_url.trim_end_matches('/');
        let send_message_url = Url::parse(&format!("{base}/bot{token}/sendMessage"))?;

        let client = create_retryable_http_client(
            &config.retry_policy,
            request_timeout,
            config.connect_timeout_secs,
        )?;

        Ok(Self { send_message_url, client })
    }
}

#[async_trait]
impl NotificationSink for TelegramNotifier {
    async fn notify(&self, subscriber: &SubscriberRef, text: &str) -> Result<(), NotificationError> {
        let payload = json!({
            "chat_id": subscriber.as_str(),
            "text": text,
        });

        let response =
            self.client.post(self.send_message_url.clone()).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::NotifyFailed(format!(
                "Telegram request failed with status {status}: {body}"
            )));
        }

        Ok(())
    }
}
