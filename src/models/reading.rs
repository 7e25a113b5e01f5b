use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::timestamp::{month_label, parse_timestamp};

/// One row as read from a meter export. `None` means the source has no such
/// column; a blank cell is `Some("")`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub timestamp: Option<String>,
    pub kwh: Option<String>,
    pub building: Option<String>,
    pub month: Option<String>,
}

/// Why a single row was dropped during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    UnparseableTimestamp,
    InvalidKwh,
    NegativeKwh,
    MissingBuilding,
}

/// A validated meter reading with every optional field filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MeterRecord {
    pub timestamp: NaiveDateTime,

    pub kwh: f64,

    #[validate(length(min = 1))]
    pub building: String,

    /// `YYYY-MM` when inferred; a source's own label is kept verbatim
    pub month: String,
}

impl MeterRecord {
    pub fn new(timestamp: NaiveDateTime, kwh: f64, building: impl Into<String>) -> Self {
        Self {
            month: month_label(&timestamp),
            timestamp,
            kwh,
            building: building.into(),
        }
    }

    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = month.into();
        self
    }

    pub fn has_finite_kwh(&self) -> bool {
        self.kwh.is_finite()
    }
}

impl RawRecord {
    /// Normalize this row. `inferred_building` fills a missing building
    /// column; a blank cell in a present column drops the row instead.
    pub fn normalize(
        &self,
        inferred_building: Option<&str>,
        allow_negative_kwh: bool,
    ) -> std::result::Result<MeterRecord, RowRejection> {
        let timestamp = self
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .ok_or(RowRejection::UnparseableTimestamp)?;

        let kwh = self
            .kwh
            .as_deref()
            .map(str::trim)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or(RowRejection::InvalidKwh)?;

        if kwh < 0.0 && !allow_negative_kwh {
            return Err(RowRejection::NegativeKwh);
        }

        let building = match (&self.building, inferred_building) {
            (Some(cell), _) => cell.trim().to_string(),
            (None, Some(inferred)) => inferred.to_string(),
            (None, None) => String::new(),
        };

        let month = self
            .month
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| month_label(&timestamp));

        let record = MeterRecord {
            timestamp,
            kwh,
            building,
            month,
        };

        // Only the building field carries a rule
        record
            .validate()
            .map_err(|_| RowRejection::MissingBuilding)?;

        Ok(record)
    }
}
