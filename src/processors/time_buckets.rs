use crate::models::{AggregateRow, Granularity, MeterRecord};
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;

/// Start of the bucket containing `timestamp`. Days run midnight to
/// midnight; weeks run Monday through Sunday. Timestamps are naive, so no
/// timezone shift happens here.
pub fn bucket_start(timestamp: NaiveDateTime, granularity: Granularity) -> NaiveDateTime {
    let date = timestamp.date();
    let start = match granularity {
        Granularity::Daily => date,
        Granularity::Weekly => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
    };
    start.and_time(NaiveTime::MIN)
}

/// Sums consumption per (building, time bucket)
pub struct TimeBucketAggregator;

impl TimeBucketAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn daily_totals(&self, records: &[MeterRecord]) -> Vec<AggregateRow> {
        self.aggregate(records, Granularity::Daily)
    }

    pub fn weekly_totals(&self, records: &[MeterRecord]) -> Vec<AggregateRow> {
        self.aggregate(records, Granularity::Weekly)
    }

    /// One row per observed (building, bucket); empty buckets produce no
    /// row. Output is ordered by building, then bucket.
    pub fn aggregate(&self, records: &[MeterRecord], granularity: Granularity) -> Vec<AggregateRow> {
        let mut buckets: BTreeMap<(&str, NaiveDateTime), f64> = BTreeMap::new();

        for record in records.iter().filter(|r| r.has_finite_kwh()) {
            let start = bucket_start(record.timestamp, granularity);
            *buckets.entry((record.building.as_str(), start)).or_insert(0.0) += record.kwh;
        }

        buckets
            .into_iter()
            .map(|((building, bucket_start), kwh)| AggregateRow {
                building: building.to_string(),
                bucket_start,
                kwh,
                granularity,
            })
            .collect()
    }
}

impl Default for TimeBucketAggregator {
    fn default() -> Self {
        Self::new()
    }
}
