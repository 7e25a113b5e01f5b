use crate::error::Result;
use crate::models::{CampusSummary, Granularity};
use crate::processors::{PipelineOutput, TrendLabel};
use crate::readers::ErrorLog;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Serialize)]
struct JsonSummary<'a> {
    total_campus_kwh: f64,
    highest_building: &'a str,
    peak_time: Option<String>,
    peak_day: Option<String>,
    peak_day_kwh: Option<f64>,
    daily_trend: TrendLabel,
    weekly_trend: TrendLabel,
    readings: usize,
    buildings: usize,
    source_errors: Vec<String>,
}

/// Renders the human-readable summary and its JSON twin
pub struct ReportWriter;

impl ReportWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn render_text(
        &self,
        campus: &CampusSummary,
        daily_trend: TrendLabel,
        weekly_trend: TrendLabel,
        error_log: &ErrorLog,
    ) -> String {
        let mut report = String::new();

        report.push_str("Campus Energy Consumption Summary\n");
        report.push_str("---------------------------------\n\n");
        report.push_str(&format!(
            "Total campus consumption: {:.2} kWh\n",
            campus.total_campus_kwh
        ));
        report.push_str(&format!(
            "Highest-consuming building: {}\n",
            campus.highest_building
        ));
        report.push_str(&format!(
            "Peak load time (max single reading): {}\n",
            campus.peak_time_display()
        ));
        if let Some(peak_day) = &campus.peak_day {
            report.push_str(&format!(
                "Peak consumption day: {} ({:.2} kWh)\n",
                peak_day.day, peak_day.kwh
            ));
        }

        report.push_str("\nDaily Trend Insights:\n");
        report.push_str(daily_trend.comment(Granularity::Daily));
        report.push_str("\n\nWeekly Trend Insights:\n");
        report.push_str(weekly_trend.comment(Granularity::Weekly));
        report.push('\n');

        if !error_log.is_empty() {
            report.push_str(&format!("\nSource Issues ({}):\n", error_log.len()));
            for message in error_log.messages() {
                report.push_str(&format!("  - {}\n", message));
            }
        }

        report
    }

    pub fn write_text(&self, output: &PipelineOutput, path: &Path) -> Result<()> {
        let text = self.render_text(
            &output.campus,
            output.daily_trend,
            output.weekly_trend,
            &output.error_log,
        );
        fs::write(path, text)?;
        Ok(())
    }

    pub fn write_json(&self, output: &PipelineOutput, path: &Path) -> Result<()> {
        let campus = &output.campus;
        let summary = JsonSummary {
            total_campus_kwh: campus.total_campus_kwh,
            highest_building: &campus.highest_building,
            peak_time: campus.peak_time().map(|ts| ts.to_string()),
            peak_day: campus.peak_day.as_ref().map(|p| p.day.to_string()),
            peak_day_kwh: campus.peak_day.as_ref().map(|p| p.kwh),
            daily_trend: output.daily_trend,
            weekly_trend: output.weekly_trend,
            readings: output.dataset.len(),
            buildings: output.building_summary.len(),
            source_errors: output.error_log.messages(),
        };

        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json)?;
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::models::{PeakDay, PeakLookup};
    use crate::readers::ErrorLogEntry;
    use chrono::NaiveDate;

    #[test]
    fn test_render_text() {
        let campus = CampusSummary {
            total_campus_kwh: 35.0,
            highest_building: "library".to_string(),
            peak_lookup: PeakLookup::Found(
                NaiveDate::from_ymd_opt(2024, 1, 2)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
            ),
            peak_day: Some(PeakDay {
                day: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                kwh: 20.0,
            }),
        };
        let mut log = ErrorLog::new();
        log.push(ErrorLogEntry::from_source_error(
            "bad.csv",
            &SourceError::MissingColumn("kwh"),
        ));

        let text = ReportWriter::new().render_text(
            &campus,
            TrendLabel::Increasing,
            TrendLabel::InsufficientData,
            &log,
        );

        assert!(text.starts_with("Campus Energy Consumption Summary\n"));
        assert!(text.contains("Total campus consumption: 35.00 kWh\n"));
        assert!(text.contains("Highest-consuming building: library\n"));
        assert!(text.contains("Peak load time (max single reading): 2024-01-02 00:00:00\n"));
        assert!(text.contains("Peak consumption day: 2024-01-02 (20.00 kWh)\n"));
        assert!(text.contains("Overall daily consumption shows an increasing trend over time."));
        assert!(text.contains("Not enough data to determine weekly trends."));
        assert!(text.contains("  - File bad.csv missing 'kwh' column. Skipped.\n"));
    }

    #[test]
    fn test_render_degenerate_summary() {
        let text = ReportWriter::new().render_text(
            &CampusSummary::degenerate(),
            TrendLabel::InsufficientData,
            TrendLabel::InsufficientData,
            &ErrorLog::new(),
        );

        assert!(text.contains("Total campus consumption: 0.00 kWh\n"));
        assert!(text.contains("Highest-consuming building: N/A\n"));
        assert!(text.contains("Peak load time (max single reading): N/A\n"));
        assert!(!text.contains("Peak consumption day"));
        assert!(!text.contains("Source Issues"));
    }
}
