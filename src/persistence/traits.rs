//! The statistics store interface.

use async_trait::async_trait;
use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;

use super::error::PersistenceError;
use crate::models::FinalizedHourRecord;

/// Durable, append-only storage for finalized hourly records.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatisticsSink: Send + Sync {
    /// Appends one record. Records are never rewritten.
    async fn append(&self, record: &FinalizedHourRecord) -> Result<(), PersistenceError>;

    /// Returns the records whose date lies in `start..=end`, in file order.
    async fn records_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FinalizedHourRecord>, PersistenceError>;

    /// Ensures all pending writes are flushed to disk.
    async fn flush(&self) -> Result<(), PersistenceError>;
}
