use crate::cli::args::{Cli, Commands};
use crate::config::DashboardConfig;
use crate::error::{ProcessingError, Result};
use crate::models::UnifiedDataset;
use crate::processors::{EnergyPipeline, PipelineOutput};
use crate::readers::ErrorLog;
use crate::utils::progress::ProgressReporter;
use crate::writers::{OutputWriter, ReportWriter};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use validator::Validate;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let mut config = DashboardConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            data_dir,
            output_dir,
            no_chart,
            parquet,
            compression,
            allow_negative,
        } => {
            override_data_dir(&mut config, data_dir);
            if let Some(dir) = output_dir {
                config.output_dir = dir.to_string_lossy().into_owned();
            }
            if no_chart {
                config.write_chart = false;
            }
            if parquet {
                config.write_parquet = true;
            }
            if let Some(compression) = compression {
                config.compression = compression;
            }
            if allow_negative {
                config.allow_negative_kwh = true;
            }
            config.validate()?;
            debug!(?config, "Effective settings");

            let output = run_pipeline(&config, cli.quiet)?;

            let writer = OutputWriter::from_config(&config)?;
            let progress = ProgressReporter::new_spinner("Writing outputs...", cli.quiet);
            let written = writer.write_all(&output)?;
            progress.finish_with_message(&format!("Wrote {} files", written.len()));

            print_summary(&output);
            println!("\nOutputs written to {}:", writer.output_dir().display());
            for path in &written {
                println!("  {}", path.display());
            }

            if let Some(file_info) = writer.parquet_file_info()? {
                println!("\n{}", file_info.summary());
            }
        }

        Commands::Validate { data_dir } => {
            override_data_dir(&mut config, data_dir);
            config.validate()?;

            let data_dir = config.data_path();
            info!(data_dir = %data_dir.display(), "Validating meter data");

            let progress = ProgressReporter::new(0, "Loading meter data...", cli.quiet);
            let (dataset, error_log) = EnergyPipeline::new()
                .with_allow_negative_kwh(config.allow_negative_kwh)
                .loader()
                .load_all(&data_dir, Some(&progress))?;
            progress.finish_with_message(&format!("Loaded {} readings", dataset.len()));

            print!("{}", validation_report(&dataset, &error_log));
        }

        Commands::Summary { data_dir } => {
            override_data_dir(&mut config, data_dir);
            config.validate()?;

            let output = run_pipeline(&config, cli.quiet)?;
            print_summary(&output);

            println!("\nPer-building peaks:");
            for report in &output.building_reports {
                println!(
                    "  {}: total {:.2} kWh, peak {:.2} kWh at {}",
                    report.building, report.total_kwh, report.peak_kwh, report.peak_time
                );
            }
        }
    }

    Ok(())
}

fn override_data_dir(config: &mut DashboardConfig, data_dir: Option<PathBuf>) {
    if let Some(dir) = data_dir {
        config.data_dir = dir.to_string_lossy().into_owned();
    }
}

fn run_pipeline(config: &DashboardConfig, quiet: bool) -> Result<PipelineOutput> {
    let data_dir = config.data_path();
    info!(data_dir = %data_dir.display(), "Loading meter data");

    let progress = ProgressReporter::new(0, "Loading meter data...", quiet);
    EnergyPipeline::new()
        .with_allow_negative_kwh(config.allow_negative_kwh)
        .run(&data_dir, Some(&progress))
}

/// Record counts and per-file issues of a load, without any aggregation
fn validation_report(dataset: &UnifiedDataset, error_log: &ErrorLog) -> String {
    let (first, last) = dataset.time_span();
    let counts = dataset.building_counts();

    let mut report = format!(
        "Loaded {} readings for {} buildings ({} to {})\n",
        dataset.len(),
        counts.len(),
        first,
        last
    );
    for (building, count) in &counts {
        report.push_str(&format!("  {}: {} readings\n", building, count));
    }

    if error_log.is_empty() {
        report.push_str("All source files loaded cleanly\n");
    } else {
        report.push_str(&format!("\n{} source file(s) had issues:\n", error_log.len()));
        for message in error_log.messages() {
            report.push_str(&format!("  - {}\n", message));
        }
    }

    report
}

fn print_summary(output: &PipelineOutput) {
    let text = ReportWriter::new().render_text(
        &output.campus,
        output.daily_trend,
        output.weekly_trend,
        &output.error_log,
    );
    println!("\n{}", text);
}

/// Console logging to stderr, plus an uncoloured copy to `log_file` when given.
/// `RUST_LOG` overrides the level picked from the flags.
fn init_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let stderr_layer = fmt::layer()
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .with_filter(filter(level));

    let file_layer = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(filter(level)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::models::MeterRecord;
    use crate::readers::ErrorLogEntry;
    use chrono::NaiveDate;

    #[test]
    fn test_validation_report_lists_counts_and_issues() {
        let at = |day| {
            NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let dataset = UnifiedDataset::new(vec![
            MeterRecord::new(at(1), 10.0, "library"),
            MeterRecord::new(at(2), 20.0, "library"),
            MeterRecord::new(at(1), 5.0, "gym"),
        ])
        .unwrap();
        let mut log = ErrorLog::new();
        log.push(ErrorLogEntry::from_source_error("broken.csv", &SourceError::MissingColumn("kwh")));

        let report = validation_report(&dataset, &log);

        assert!(report.starts_with(
            "Loaded 3 readings for 2 buildings (2024-01-01 00:00:00 to 2024-01-02 00:00:00)\n"
        ));
        assert!(report.contains("  gym: 1 readings\n  library: 2 readings\n"));
        assert!(report.contains("1 source file(s) had issues:"));
        assert!(report.contains("  - File broken.csv missing 'kwh' column. Skipped.\n"));
    }

    #[test]
    fn test_validation_report_clean_load() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let dataset = UnifiedDataset::new(vec![MeterRecord::new(ts, 1.0, "hall")]).unwrap();

        let report = validation_report(&dataset, &ErrorLog::new());
        assert!(report.ends_with("All source files loaded cleanly\n"));
    }
}
