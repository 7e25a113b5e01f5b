use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::constants::NOT_AVAILABLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Daily,
    Weekly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
        }
    }

    /// Number of calendar days covered by one bucket
    pub fn span_days(&self) -> i64 {
        match self {
            Granularity::Daily => 1,
            Granularity::Weekly => 7,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summed consumption of one building within one time bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub building: String,
    pub bucket_start: NaiveDateTime,
    pub kwh: f64,
    pub granularity: Granularity,
}

impl AggregateRow {
    /// Last calendar day inside the bucket. For weekly rows this is the
    /// Sunday the week is labelled by.
    pub fn bucket_end(&self) -> NaiveDate {
        self.bucket_start.date() + Duration::days(self.granularity.span_days() - 1)
    }
}

pub type DailyAggregateRow = AggregateRow;
pub type WeeklyAggregateRow = AggregateRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingSummaryRow {
    pub building: String,
    pub total_kwh: f64,
    pub mean_kwh: f64,
    pub min_kwh: f64,
    pub max_kwh: f64,
    pub readings_count: usize,
}

/// Outcome of locating the single largest reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PeakLookup {
    Found(NaiveDateTime),
    NotFound,
    Error(String),
}

impl PeakLookup {
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            PeakLookup::Found(ts) => Some(*ts),
            PeakLookup::NotFound | PeakLookup::Error(_) => None,
        }
    }
}

/// Campus-wide daily maximum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakDay {
    pub day: NaiveDate,
    pub kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampusSummary {
    pub total_campus_kwh: f64,
    pub highest_building: String,
    pub peak_lookup: PeakLookup,
    pub peak_day: Option<PeakDay>,
}

impl CampusSummary {
    /// Result for a dataset with no readings
    pub fn degenerate() -> Self {
        Self {
            total_campus_kwh: 0.0,
            highest_building: NOT_AVAILABLE.to_string(),
            peak_lookup: PeakLookup::NotFound,
            peak_day: None,
        }
    }

    /// Peak timestamp with lookup failures folded into the null sentinel
    pub fn peak_time(&self) -> Option<NaiveDateTime> {
        self.peak_lookup.timestamp()
    }

    pub fn peak_time_display(&self) -> String {
        self.peak_time()
            .map(|ts| ts.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_bucket_end_is_sunday() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let row = AggregateRow {
            building: "library".to_string(),
            bucket_start: monday,
            kwh: 1.0,
            granularity: Granularity::Weekly,
        };
        assert_eq!(row.bucket_end(), NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());

        let daily = AggregateRow {
            granularity: Granularity::Daily,
            ..row
        };
        assert_eq!(daily.bucket_end(), monday.date());
    }

    #[test]
    fn test_degenerate_summary() {
        let summary = CampusSummary::degenerate();
        assert_eq!(summary.total_campus_kwh, 0.0);
        assert_eq!(summary.highest_building, "N/A");
        assert_eq!(summary.peak_time(), None);
        assert_eq!(summary.peak_time_display(), "N/A");
    }

    #[test]
    fn test_peak_lookup_error_downgrades_to_none() {
        let lookup = PeakLookup::Error("no finite readings".to_string());
        assert_eq!(lookup.timestamp(), None);
    }
}
