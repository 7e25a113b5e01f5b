use crate::models::{AggregateRow, Granularity};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrendLabel {
    Increasing,
    Decreasing,
    Stable,
    InsufficientData,
}

impl TrendLabel {
    /// Human-readable sentence for the report
    pub fn comment(&self, granularity: Granularity) -> &'static str {
        match (granularity, self) {
            (Granularity::Daily, TrendLabel::Increasing) => {
                "Overall daily consumption shows an increasing trend over time."
            }
            (Granularity::Daily, TrendLabel::Decreasing) => {
                "Overall daily consumption shows a decreasing trend over time."
            }
            (Granularity::Daily, TrendLabel::Stable) => {
                "Overall daily consumption remains relatively stable."
            }
            (Granularity::Daily, TrendLabel::InsufficientData) => {
                "Not enough data to determine daily trends."
            }
            (Granularity::Weekly, TrendLabel::Increasing) => "Weekly consumption is trending upwards.",
            (Granularity::Weekly, TrendLabel::Decreasing) => {
                "Weekly consumption is trending downwards."
            }
            (Granularity::Weekly, TrendLabel::Stable) => "Weekly consumption appears stable.",
            (Granularity::Weekly, TrendLabel::InsufficientData) => {
                "Not enough data to determine weekly trends."
            }
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TrendLabel::Increasing => "increasing",
            TrendLabel::Decreasing => "decreasing",
            TrendLabel::Stable => "stable",
            TrendLabel::InsufficientData => "insufficient data",
        };
        f.write_str(label)
    }
}

/// Classifies the direction of campus consumption across buckets
pub struct TrendCommentator;

impl TrendCommentator {
    pub fn new() -> Self {
        Self
    }

    /// Compare the campus total of the earliest bucket with the latest one.
    /// Only the two end points matter; nothing in between is fitted.
    pub fn comment(&self, rows: &[AggregateRow]) -> TrendLabel {
        let series = self.campus_series(rows);

        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) if series.len() >= 2 => (first.1, last.1),
            _ => return TrendLabel::InsufficientData,
        };

        if last > first {
            TrendLabel::Increasing
        } else if last < first {
            TrendLabel::Decreasing
        } else {
            TrendLabel::Stable
        }
    }

    /// Bucket totals summed over all buildings, ascending by bucket
    pub fn campus_series(&self, rows: &[AggregateRow]) -> Vec<(NaiveDateTime, f64)> {
        let mut totals: BTreeMap<NaiveDateTime, f64> = BTreeMap::new();
        for row in rows {
            *totals.entry(row.bucket_start).or_insert(0.0) += row.kwh;
        }
        totals.into_iter().collect()
    }
}

impl Default for TrendCommentator {
    fn default() -> Self {
        Self::new()
    }
}
