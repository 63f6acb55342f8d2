//! This module defines the interface for pulling queue snapshots from the
//! checkpoint.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::models::QueueEntry;

/// Custom error type for snapshot fetching.
///
/// The tracker treats every variant the same way (the poll is unavailable);
/// the distinction only matters for logging.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Error when parsing the checkpoint URL.
    #[error("Failed to parse checkpoint URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// The checkpoint API could not be reached or answered with an error
    /// status.
    #[error("Checkpoint API unreachable: {0}")]
    Unreachable(String),

    /// The checkpoint API did not answer in time.
    #[error("Checkpoint API did not respond within {0:?}")]
    Timeout(Duration),

    /// The response body did not have the expected shape.
    #[error("Malformed checkpoint response: {0}")]
    Malformed(String),
}

/// A trait for a source of queue snapshots.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Fetches the current queue. Malformed individual entries are skipped,
    /// not reported as errors.
    async fn fetch(&self) -> Result<Vec<QueueEntry>, FetchError>;
}
