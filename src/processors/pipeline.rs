use crate::error::Result;
use crate::models::{
    AggregateRow, BuildingManager, BuildingReport, BuildingSummaryRow, CampusSummary,
    UnifiedDataset,
};
use crate::processors::{Summarizer, TimeBucketAggregator, TrendCommentator, TrendLabel};
use crate::readers::{DirectoryLoader, ErrorLog, MeterFileReader};
use crate::utils::progress::ProgressReporter;
use std::path::Path;
use tracing::info;

/// Everything one batch run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub dataset: UnifiedDataset,
    pub error_log: ErrorLog,
    pub daily: Vec<AggregateRow>,
    pub weekly: Vec<AggregateRow>,
    pub building_summary: Vec<BuildingSummaryRow>,
    pub building_reports: Vec<BuildingReport>,
    pub campus: CampusSummary,
    pub daily_trend: TrendLabel,
    pub weekly_trend: TrendLabel,
}

/// Runs load, aggregation, modelling and summary stages in sequence
pub struct EnergyPipeline {
    allow_negative_kwh: bool,
}

impl EnergyPipeline {
    pub fn new() -> Self {
        Self {
            allow_negative_kwh: false,
        }
    }

    pub fn with_allow_negative_kwh(mut self, allow_negative_kwh: bool) -> Self {
        self.allow_negative_kwh = allow_negative_kwh;
        self
    }

    pub fn loader(&self) -> DirectoryLoader {
        DirectoryLoader::with_reader(MeterFileReader::with_allow_negative_kwh(
            self.allow_negative_kwh,
        ))
    }

    pub fn run(&self, data_dir: &Path, progress: Option<&ProgressReporter>) -> Result<PipelineOutput> {
        if let Some(p) = progress {
            p.set_message("Loading meter data...");
        }
        let (dataset, error_log) = self.loader().load_all(data_dir, progress)?;

        if let Some(p) = progress {
            p.set_message("Aggregating consumption...");
        }
        let output = self.analyze(dataset, error_log);

        if let Some(p) = progress {
            p.finish_with_message(&format!("Processed {} readings", output.dataset.len()));
        }

        Ok(output)
    }

    /// Aggregation and summary stages over an already loaded dataset
    pub fn analyze(&self, dataset: UnifiedDataset, error_log: ErrorLog) -> PipelineOutput {
        let records = dataset.records();

        let aggregator = TimeBucketAggregator::new();
        let daily = aggregator.daily_totals(records);
        let weekly = aggregator.weekly_totals(records);
        info!(daily = daily.len(), weekly = weekly.len(), "Computed time buckets");

        let summarizer = Summarizer::new();
        let building_summary = summarizer.building_summary(records);
        let campus = summarizer.campus_summary(records, &daily);

        let mut manager = BuildingManager::new();
        manager.load_from_dataset(&dataset);
        let building_reports = manager.generate_all_reports();

        let commentator = TrendCommentator::new();
        let daily_trend = commentator.comment(&daily);
        let weekly_trend = commentator.comment(&weekly);

        info!(
            total_kwh = campus.total_campus_kwh,
            highest = %campus.highest_building,
            daily_trend = %daily_trend,
            weekly_trend = %weekly_trend,
            "Campus summary ready"
        );

        PipelineOutput {
            dataset,
            error_log,
            daily,
            weekly,
            building_summary,
            building_reports,
            campus,
            daily_trend,
            weekly_trend,
        }
    }
}

impl Default for EnergyPipeline {
    fn default() -> Self {
        Self::new()
    }
}
