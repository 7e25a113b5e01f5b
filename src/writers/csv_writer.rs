use crate::error::Result;
use crate::models::{AggregateRow, BuildingSummaryRow, MeterRecord};
use serde::Serialize;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Serialize)]
struct CleanedRow<'a> {
    timestamp: String,
    kwh: f64,
    building: &'a str,
    month: &'a str,
}

#[derive(Serialize)]
struct DailyRow<'a> {
    building: &'a str,
    timestamp: String,
    daily_kwh: f64,
}

#[derive(Serialize)]
struct WeeklyRow<'a> {
    building: &'a str,
    week_start: String,
    week_ending: String,
    weekly_kwh: f64,
}

/// Writes the tabular exports of a run as CSV
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_cleaned_data(&self, records: &[MeterRecord], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for record in records {
            writer.serialize(CleanedRow {
                timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
                kwh: record.kwh,
                building: &record.building,
                month: &record.month,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_building_summary(&self, rows: &[BuildingSummaryRow], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_daily_totals(&self, rows: &[AggregateRow], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in rows {
            writer.serialize(DailyRow {
                building: &row.building,
                timestamp: row.bucket_start.format(DATE_FORMAT).to_string(),
                daily_kwh: row.kwh,
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_weekly_totals(&self, rows: &[AggregateRow], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for row in rows {
            writer.serialize(WeeklyRow {
                building: &row.building,
                week_start: row.bucket_start.format(DATE_FORMAT).to_string(),
                week_ending: row.bucket_end().format(DATE_FORMAT).to_string(),
                weekly_kwh: row.kwh,
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
