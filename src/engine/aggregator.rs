//! Hourly departure counting.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::{FinalizedHourRecord, HourKey};

/// Errors raised when departures are recorded against the wrong bucket.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregatorError {
    /// `record_departure` was called before the first `tick`.
    #[error("No hour bucket is open; tick must run before recording departures")]
    NoOpenBucket,

    /// `record_departure` was called with a timestamp outside the open bucket.
    #[error("Departure at {at} does not belong to the open bucket {open}")]
    OutsideOpenBucket {
        /// Hour of the rejected timestamp.
        at: HourKey,
        /// Hour of the open bucket.
        open: HourKey,
    },
}

#[derive(Debug, Clone, Copy)]
struct HourBucket {
    key: HourKey,
    count: u64,
}

/// Accumulates departures for the current clock hour and finalizes the bucket
/// when the hour rolls over.
///
/// Exactly one bucket is open after the first [`tick`](Self::tick). Its count
/// only changes while it is open.
#[derive(Debug, Default)]
pub struct HourlyAggregator {
    open: Option<HourBucket>,
}

impl HourlyAggregator {
    /// Creates an aggregator with no open bucket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the aggregator to the hour containing `now`.
    ///
    /// Returns the finalized record of the previously open bucket when the
    /// hour changed. The first call only opens a bucket. Calls within the open
    /// hour, or with a `now` earlier than the open hour, are no-ops.
    pub fn tick(&mut self, now: NaiveDateTime) -> Option<FinalizedHourRecord> {
        let key = HourKey::containing(now);

        let Some(bucket) = self.open else {
            tracing::debug!(hour = %key, "Opening initial hour bucket.");
            self.open = Some(HourBucket { key, count: 0 });
            return None;
        };

        if key == bucket.key {
            return None;
        }

        if key < bucket.key {
            tracing::warn!(open = %bucket.key, now = %key, "Clock moved backwards; keeping the open hour bucket.");
            return None;
        }

        let record = FinalizedHourRecord::for_bucket(bucket.key, bucket.count);
        tracing::debug!(closed = %bucket.key, opened = %key, count = bucket.count, "Hour rolled over.");
        self.open = Some(HourBucket { key, count: 0 });
        Some(record)
    }

    /// Adds `count` departures observed at `at` to the open bucket.
    pub fn record_departure(&mut self, count: u64, at: NaiveDateTime) -> Result<(), AggregatorError> {
        let bucket = self.open.as_mut().ok_or(AggregatorError::NoOpenBucket)?;
        let key = HourKey::containing(at);
        if key != bucket.key {
            return Err(AggregatorError::OutsideOpenBucket { at: key, open: bucket.key });
        }
        bucket.count += count;
        Ok(())
    }

    /// The open bucket's hour and running count.
    pub fn open_bucket(&self) -> Option<(HourKey, u64)> {
        self.open.map(|bucket| (bucket.key, bucket.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::at;

    #[test]
    fn test_first_tick_only_opens_bucket() {
        let mut aggregator = HourlyAggregator::new();
        assert_eq!(aggregator.tick(at(10, 5)), None);
        assert_eq!(aggregator.open_bucket(), Some((HourKey::containing(at(10, 5)), 0)));
    }

    #[test]
    fn test_tick_is_idempotent_within_hour() {
        let mut aggregator = HourlyAggregator::new();
        aggregator.tick(at(10, 5));
        aggregator.record_departure(2, at(10, 5)).unwrap();

        assert_eq!(aggregator.tick(at(10, 30)), None);
        assert_eq!(aggregator.tick(at(10, 59)), None);
        assert_eq!(aggregator.open_bucket().map(|(_, count)| count), Some(2));
    }

    #[test]
    fn test_rollover_finalizes_previous_hour() {
        let mut aggregator = HourlyAggregator::new();
        aggregator.tick(at(10, 5));
        aggregator.record_departure(3, at(10, 5)).unwrap();
        aggregator.record_departure(4, at(10, 50)).unwrap();

        let record = aggregator.tick(at(11, 0)).expect("hour should roll over");

        assert_eq!(record.to_string(), "05.03.2025 10-11 7");
        assert_eq!(aggregator.open_bucket(), Some((HourKey::containing(at(11, 0)), 0)));
    }

    #[test]
    fn test_skipped_hours_produce_single_record() {
        let mut aggregator = HourlyAggregator::new();
        aggregator.tick(at(10, 5));
        aggregator.record_departure(1, at(10, 5)).unwrap();

        let record = aggregator.tick(at(13, 20)).unwrap();
        assert_eq!((record.start_hour, record.end_hour, record.count), (10, 11, 1));
        assert_eq!(aggregator.tick(at(13, 40)), None);
    }

    #[test]
    fn test_record_before_tick_is_rejected() {
        let mut aggregator = HourlyAggregator::new();
        assert_eq!(aggregator.record_departure(1, at(10, 5)), Err(AggregatorError::NoOpenBucket));
    }

    #[test]
    fn test_record_outside_open_bucket_is_rejected() {
        let mut aggregator = HourlyAggregator::new();
        aggregator.tick(at(10, 5));

        let result = aggregator.record_departure(1, at(11, 5));
        assert!(matches!(result, Err(AggregatorError::OutsideOpenBucket { .. })));
        assert_eq!(aggregator.open_bucket().map(|(_, count)| count), Some(0));
    }

    #[test]
    fn test_clock_moving_backwards_keeps_open_bucket() {
        let mut aggregator = HourlyAggregator::new();
        aggregator.tick(at(11, 5));
        aggregator.record_departure(5, at(11, 5)).unwrap();

        assert_eq!(aggregator.tick(at(10, 55)), None);
        assert_eq!(aggregator.open_bucket(), Some((HourKey::containing(at(11, 5)), 5)));
    }
}
