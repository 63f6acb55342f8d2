//! Per-day grouping of finalized hourly records.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use super::{FinalizedHourRecord, hour::RECORD_DATE_FORMAT};

fn serialize_record_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format(RECORD_DATE_FORMAT))
}

/// Departures counted in one hour range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourCount {
    /// `HH-HH` label.
    pub hours: String,
    /// Vehicles that left the queue.
    pub count: u64,
}

/// All records of one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStatistics {
    /// The date, serialized as `DD.MM.YYYY`.
    #[serde(serialize_with = "serialize_record_date")]
    pub date: NaiveDate,
    /// Hour ranges in record order.
    pub hours: Vec<HourCount>,
    /// Sum of the day's counts.
    pub total: u64,
}

/// Records grouped by date, in the order the dates first appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatisticsReport {
    /// One entry per date.
    pub days: Vec<DayStatistics>,
    /// Sum over all days.
    pub total: u64,
}

impl StatisticsReport {
    /// Groups `records` by their date.
    pub fn from_records(records: &[FinalizedHourRecord]) -> Self {
        let mut report = Self::default();
        for record in records {
            let hour = HourCount { hours: record.hour_range(), count: record.count };
            match report.days.iter_mut().find(|day| day.date == record.date) {
                Some(day) => {
                    day.total += record.count;
                    day.hours.push(hour);
                }
                None => report.days.push(DayStatistics {
                    date: record.date,
                    hours: vec![hour],
                    total: record.count,
                }),
            }
            report.total += record.count;
        }
        report
    }

    /// Whether the report has no records.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
