use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::{
    models::FinalizedHourRecord,
    persistence::{PersistenceError, StatisticsSink},
};

/// An in-memory statistics sink.
#[derive(Debug, Default)]
pub struct MemoryStatisticsSink {
    records: Mutex<Vec<FinalizedHourRecord>>,
    flushes: Mutex<usize>,
}

impl MemoryStatisticsSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sink that already holds `records`.
    pub fn with_records(records: Vec<FinalizedHourRecord>) -> Self {
        Self { records: Mutex::new(records), flushes: Mutex::new(0) }
    }

    /// Everything appended so far.
    pub async fn records(&self) -> Vec<FinalizedHourRecord> {
        self.records.lock().await.clone()
    }

    /// Number of `flush` calls.
    pub async fn flushes(&self) -> usize {
        *self.flushes.lock().await
    }
}

#[async_trait]
impl StatisticsSink for MemoryStatisticsSink {
    async fn append(&self, record: &FinalizedHourRecord) -> Result<(), PersistenceError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn records_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FinalizedHourRecord>, PersistenceError> {
        if start > end {
            return Err(PersistenceError::InvalidInput(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|record| (start..=end).contains(&record.date))
            .cloned()
            .collect())
    }

    async fn flush(&self) -> Result<(), PersistenceError> {
        *self.flushes.lock().await += 1;
        Ok(())
    }
}
