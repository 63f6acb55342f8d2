//! HTTP client for the checkpoint's live queue endpoint.
//!
//! The endpoint answers with a JSON object whose `carLiveQueue` array lists
//! the waiting vehicles:
//!
//! ```json
//! { "carLiveQueue": [ { "regnum": "AB1234", "order_id": 1 }, ... ] }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use url::Url;

use super::traits::{FetchError, SnapshotFetcher};
use crate::models::{Identifier, QueueEntry};

const QUEUE_FIELD: &str = "carLiveQueue";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                                  (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

/// Fetches queue snapshots from the checkpoint monitoring API.
#[derive(Debug, Clone)]
pub struct CheckpointApiFetcher {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl CheckpointApiFetcher {
    /// Creates a fetcher for `url`; every request is bounded by `timeout`.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let url = Url::parse(url)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Unreachable(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, url, timeout })
    }
}

#[async_trait]
impl SnapshotFetcher for CheckpointApiFetcher {
    #[tracing::instrument(skip(self), level = "debug")]
    async fn fetch(&self) -> Result<Vec<QueueEntry>, FetchError> {
        let response = self.client.get(self.url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Unreachable(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            return Err(FetchError::Unreachable(format!("HTTP {status}: {excerpt}")));
        }

        let body: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout)
            } else {
                FetchError::Malformed(e.to_string())
            }
        })?;

        parse_queue(&body)
    }
}

/// Extracts queue entries from a checkpoint response body.
pub fn parse_queue(body: &Value) -> Result<Vec<QueueEntry>, FetchError> {
    let items = body
        .get(QUEUE_FIELD)
        .and_then(Value::as_array)
        .ok_or_else(|| FetchError::Malformed(format!("`{QUEUE_FIELD}` is missing or not a list")))?;

    let entries: Vec<QueueEntry> = items.iter().filter_map(parse_entry).collect();
    let skipped = items.len() - entries.len();
    if skipped > 0 {
        tracing::debug!(skipped, total = items.len(), "Skipped malformed queue entries.");
    }
    Ok(entries)
}

fn parse_entry(item: &Value) -> Option<QueueEntry> {
    let identifier = item.get("regnum").and_then(Value::as_str).and_then(|raw| Identifier::parse(raw).ok())?;

    let position = match item.get("order_id")? {
        Value::Number(number) => number.as_u64(),
        Value::String(raw) => raw.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    let position = u32::try_from(position).ok().filter(|position| *position >= 1)?;

    Some(QueueEntry::new(identifier, position))
}
