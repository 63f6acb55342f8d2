//! Hour buckets and the finalized records written when an hour closes.

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use thiserror::Error;

/// Date format used by the statistics file.
pub const RECORD_DATE_FORMAT: &str = "%d.%m.%Y";

/// Identifies one clock hour on one calendar date.
///
/// Keys order chronologically: first by date, then by hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourKey {
    date: NaiveDate,
    hour: u32,
}

impl HourKey {
    /// The hour that contains `at`.
    pub fn containing(at: NaiveDateTime) -> Self {
        Self { date: at.date(), hour: at.hour() }
    }

    /// Calendar date of the hour.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Hour of day, `0..=23`.
    pub fn hour(&self) -> u32 {
        self.hour
    }
}

impl fmt::Display for HourKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}h", self.date.format("%Y-%m-%d"), self.hour)
    }
}

/// The immutable summary of departures counted during one completed hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizedHourRecord {
    /// Date the hour started on.
    pub date: NaiveDate,
    /// First hour of the range.
    pub start_hour: u32,
    /// Hour the range ends at (wraps to `0` after `23`).
    pub end_hour: u32,
    /// Number of vehicles that left the queue during the hour.
    pub count: u64,
}

impl FinalizedHourRecord {
    /// Builds the record for a closed bucket.
    pub fn for_bucket(key: HourKey, count: u64) -> Self {
        Self { date: key.date, start_hour: key.hour, end_hour: (key.hour + 1) % 24, count }
    }

    /// The `HH-HH` label of the hour range.
    pub fn hour_range(&self) -> String {
        format!("{:02}-{:02}", self.start_hour, self.end_hour)
    }
}

/// Renders the record as a single statistics line, e.g. `05.03.2025 10-11 42`.
impl fmt::Display for FinalizedHourRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date.format(RECORD_DATE_FORMAT), self.hour_range(), self.count)
    }
}

/// Errors produced while parsing a statistics line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordParseError {
    /// The line does not have the `date range count` shape.
    #[error("Expected 3 fields, found {0}")]
    FieldCount(usize),

    /// The date field is not `DD.MM.YYYY`.
    #[error("Invalid date: {0}")]
    Date(String),

    /// The hour range is not `HH-HH` with hours below 24.
    #[error("Invalid hour range: {0}")]
    HourRange(String),

    /// The count is not a non-negative integer.
    #[error("Invalid count: {0}")]
    Count(String),
}

impl FromStr for FinalizedHourRecord {
    type Err = RecordParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let [date, range, count] = parts.as_slice() else {
            return Err(RecordParseError::FieldCount(parts.len()));
        };

        let date = NaiveDate::parse_from_str(date, RECORD_DATE_FORMAT)
            .map_err(|_| RecordParseError::Date(date.to_string()))?;

        let parse_hour = |raw: &str| raw.parse::<u32>().ok().filter(|h| *h < 24);
        let (start_hour, end_hour) = range
            .split_once('-')
            .and_then(|(start, end)| Some((parse_hour(start)?, parse_hour(end)?)))
            .ok_or_else(|| RecordParseError::HourRange(range.to_string()))?;

        let count = count.parse::<u64>().map_err(|_| RecordParseError::Count(count.to_string()))?;

        Ok(Self { date, start_hour, end_hour, count })
    }
}

/// Parses a `DD.MM.YYYY` date as used in statistics queries.
pub fn parse_record_date(raw: &str) -> Result<NaiveDate, RecordParseError> {
    NaiveDate::parse_from_str(raw.trim(), RECORD_DATE_FORMAT)
        .map_err(|_| RecordParseError::Date(raw.to_string()))
}
