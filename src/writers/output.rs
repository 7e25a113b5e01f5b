use crate::config::DashboardConfig;
use crate::error::Result;
use crate::processors::PipelineOutput;
use crate::utils::constants::{
    BUILDING_SUMMARY_FILE, CLEANED_DATA_FILE, CLEANED_PARQUET_FILE, DAILY_TOTALS_FILE,
    DASHBOARD_FILE, JSON_SUMMARY_FILE, TEXT_SUMMARY_FILE, WEEKLY_TOTALS_FILE,
};
use crate::utils::filename::output_path;
use crate::writers::{ChartWriter, CsvExporter, ParquetFileInfo, ParquetWriter, ReportWriter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Persists every artifact of a run into one output directory
pub struct OutputWriter {
    output_dir: PathBuf,
    write_chart: bool,
    parquet: Option<(ParquetWriter, usize)>,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            write_chart: true,
            parquet: None,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        let mut writer = Self::new(&config.output_dir).with_chart(config.write_chart);
        if config.write_parquet {
            let parquet = ParquetWriter::new()
                .with_compression(&config.compression)?
                .with_row_group_size(config.row_group_size);
            writer = writer.with_parquet(parquet, config.batch_size);
        }
        Ok(writer)
    }

    pub fn with_chart(mut self, write_chart: bool) -> Self {
        self.write_chart = write_chart;
        self
    }

    pub fn with_parquet(mut self, writer: ParquetWriter, batch_size: usize) -> Self {
        self.parquet = Some((writer, batch_size));
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write all artifacts, returning the paths written in order
    pub fn write_all(&self, output: &PipelineOutput) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;
        let mut written = Vec::new();

        let csv = CsvExporter::new();
        let cleaned = self.path(CLEANED_DATA_FILE);
        csv.write_cleaned_data(output.dataset.records(), &cleaned)?;
        written.push(cleaned);

        let summary = self.path(BUILDING_SUMMARY_FILE);
        csv.write_building_summary(&output.building_summary, &summary)?;
        written.push(summary);

        let daily = self.path(DAILY_TOTALS_FILE);
        csv.write_daily_totals(&output.daily, &daily)?;
        written.push(daily);

        let weekly = self.path(WEEKLY_TOTALS_FILE);
        csv.write_weekly_totals(&output.weekly, &weekly)?;
        written.push(weekly);

        let report = ReportWriter::new();
        let text = self.path(TEXT_SUMMARY_FILE);
        report.write_text(output, &text)?;
        written.push(text);

        let json = self.path(JSON_SUMMARY_FILE);
        report.write_json(output, &json)?;
        written.push(json);

        if let Some((parquet, batch_size)) = &self.parquet {
            let path = self.path(CLEANED_PARQUET_FILE);
            parquet.write_records_batched(output.dataset.records(), &path, *batch_size)?;
            written.push(path);
        }

        if self.write_chart {
            if output.daily.is_empty() {
                warn!("No daily totals; dashboard chart skipped");
            } else {
                let path = self.path(DASHBOARD_FILE);
                ChartWriter::new().write_dashboard(&output.daily, &output.weekly, &path)?;
                written.push(path);
            }
        }

        for path in &written {
            info!(path = %path.display(), "Wrote output");
        }

        Ok(written)
    }

    /// Metadata of the Parquet export, when one is configured and written
    pub fn parquet_file_info(&self) -> Result<Option<ParquetFileInfo>> {
        match &self.parquet {
            Some((parquet, _)) => {
                let path = self.path(CLEANED_PARQUET_FILE);
                if path.exists() {
                    Ok(Some(parquet.get_file_info(&path)?))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    fn path(&self, file_name: &str) -> PathBuf {
        output_path(&self.output_dir, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::EnergyPipeline;
    use tempfile::TempDir;

    #[test]
    fn test_write_all_without_chart() -> Result<()> {
        let data = TempDir::new()?;
        fs::write(data.path().join("gym.csv"), "timestamp,kwh\n2024-01-01,5\n")?;
        let output = EnergyPipeline::new().run(data.path(), None)?;

        let out = TempDir::new()?;
        let target = out.path().join("nested").join("output");
        let written = OutputWriter::new(&target).with_chart(false).write_all(&output)?;

        let names: Vec<String> = written
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(
            names,
            vec![
                "cleaned_energy_data.csv",
                "building_summary.csv",
                "daily_totals.csv",
                "weekly_totals.csv",
                "summary.txt",
                "summary.json",
            ]
        );
        assert!(written.iter().all(|p| p.exists()));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(target.join("summary.json"))?)?;
        assert_eq!(json["highest_building"], "gym");
        assert_eq!(json["daily_trend"], "InsufficientData");
        Ok(())
    }

    #[test]
    fn test_write_all_with_parquet_and_chart() -> Result<()> {
        let data = TempDir::new()?;
        fs::write(
            data.path().join("library.csv"),
            "timestamp,kwh\n2024-01-01,10\n2024-01-02,20\n",
        )?;
        let output = EnergyPipeline::new().run(data.path(), None)?;

        let out = TempDir::new()?;
        let written = OutputWriter::new(out.path())
            .with_parquet(ParquetWriter::new(), 1)
            .write_all(&output)?;

        assert!(written.contains(&out.path().join("cleaned_energy_data.parquet")));
        assert!(written.contains(&out.path().join("dashboard.svg")));
        Ok(())
    }

    #[test]
    fn test_parquet_settings_come_from_config() -> Result<()> {
        let data = TempDir::new()?;
        fs::write(
            data.path().join("library.csv"),
            "timestamp,kwh\n2024-01-01,10\n2024-01-02,20\n2024-01-03,30\n",
        )?;
        let output = EnergyPipeline::new().run(data.path(), None)?;

        let out = TempDir::new()?;
        let config = DashboardConfig {
            output_dir: out.path().to_string_lossy().into_owned(),
            write_chart: false,
            write_parquet: true,
            compression: "gzip".to_string(),
            row_group_size: 1,
            ..DashboardConfig::default()
        };
        let writer = OutputWriter::from_config(&config)?;
        assert!(writer.parquet_file_info()?.is_none());

        writer.write_all(&output)?;

        let info = writer.parquet_file_info()?.unwrap();
        assert_eq!(info.total_rows, 3);
        assert_eq!(info.row_groups, 3);
        assert!(info.summary().contains("Total rows: 3"));
        Ok(())
    }

    #[test]
    fn test_no_parquet_info_without_parquet_export() -> Result<()> {
        let out = TempDir::new()?;
        assert!(OutputWriter::new(out.path()).parquet_file_info()?.is_none());
        Ok(())
    }
}
