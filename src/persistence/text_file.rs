//! Line-oriented text file storage for finalized hourly records.
//!
//! Each record is one `DD.MM.YYYY HH-HH COUNT` line. The file is only ever
//! appended to; lines that fail to parse are skipped when reading.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    sync::Mutex,
};

use super::{error::PersistenceError, traits::StatisticsSink};
use crate::models::FinalizedHourRecord;

/// Appends hourly records to a text file.
#[derive(Debug)]
pub struct TextFileStatisticsSink {
    path: PathBuf,
    /// Lazily opened append handle. The lock also serializes writers.
    writer: Mutex<Option<File>>,
}

impl TextFileStatisticsSink {
    /// Creates a sink writing to `path`. The file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), writer: Mutex::new(None) }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open_for_append(&self) -> Result<File, PersistenceError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path).await?;
        Ok(file)
    }
}

#[async_trait]
impl StatisticsSink for TextFileStatisticsSink {
    async fn append(&self, record: &FinalizedHourRecord) -> Result<(), PersistenceError> {
        let mut writer = self.writer.lock().await;
        if writer.is_none() {
            *writer = Some(self.open_for_append().await?);
        }
        let Some(file) = writer.as_mut() else {
            return Err(PersistenceError::OperationFailed("statistics file is not open".into()));
        };

        let line = format!("{record}\n");
        if let Err(e) = file.write_all(line.as_bytes()).await {
            // Reopen on the next append.
            *writer = None;
            return Err(e.into());
        }
        file.flush().await?;

        tracing::debug!(path = %self.path.display(), record = %record, "Hourly record appended.");
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

        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<FinalizedHourRecord>() {
                Ok(record) if (start..=end).contains(&record.date) => records.push(record),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(line = index + 1, error = %e, "Skipping malformed statistics line.");
                }
            }
        }
        Ok(records)
    }

    async fn flush(&self) -> Result<(), PersistenceError> {
        let mut writer = self.writer.lock().await;
        if let Some(file) = writer.as_mut() {
            file.flush().await?;
            file.sync_all().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HourKey;

    fn record(day: u32, hour: u32, count: u64) -> FinalizedHourRecord {
        let at = NaiveDate::from_ymd_opt(2025, 3, day).unwrap().and_hms_opt(hour, 0, 0).unwrap();
        FinalizedHourRecord::for_bucket(HourKey::containing(at), count)
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    #[tokio::test]
    async fn test_append_writes_one_line_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TextFileStatisticsSink::new(dir.path().join("statistic.txt"));

        sink.append(&record(5, 10, 42)).await.unwrap();
        sink.append(&record(5, 23, 0)).await.unwrap();
        sink.flush().await.unwrap();

        let content = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(content, "05.03.2025 10-11 42\n05.03.2025 23-00 0\n");
    }

    #[tokio::test]
    async fn test_append_preserves_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statistic.txt");
        std::fs::write(&path, "04.03.2025 09-10 7\n").unwrap();

        let sink = TextFileStatisticsSink::new(&path);
        sink.append(&record(5, 10, 3)).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "04.03.2025 09-10 7\n05.03.2025 10-11 3\n");
    }

    #[tokio::test]
    async fn test_records_between_filters_by_date_and_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statistic.txt");
        std::fs::write(
            &path,
            "03.03.2025 10-11 1\nnot a record\n04.03.2025 10-11 2\n\n05.03.2025 11-12 3\n06.03.2025 00-01 4\n",
        )
        .unwrap();
        let sink = TextFileStatisticsSink::new(&path);

        let records = sink.records_between(date(4), date(5)).await.unwrap();

        assert_eq!(records, vec![record(4, 10, 2), record(5, 11, 3)]);
    }

    #[tokio::test]
    async fn test_records_between_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TextFileStatisticsSink::new(dir.path().join("absent.txt"));

        assert!(sink.records_between(date(1), date(31)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_between_rejects_inverted_range() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TextFileStatisticsSink::new(dir.path().join("statistic.txt"));

        let result = sink.records_between(date(6), date(5)).await;
        assert!(matches!(result, Err(PersistenceError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_append_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let sink = TextFileStatisticsSink::new(dir.path().join("nested/stats/statistic.txt"));

        sink.append(&record(5, 10, 1)).await.unwrap();

        assert!(sink.path().exists());
    }
}
