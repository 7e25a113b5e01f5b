use crate::error::{ProcessingError, Result};
use crate::models::UnifiedDataset;
use crate::readers::error_log::{ErrorLog, ErrorLogEntry};
use crate::readers::meter_reader::MeterFileReader;
use crate::utils::filename::is_source_file;
use crate::utils::progress::ProgressReporter;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Loads every CSV export in a directory into one dataset
pub struct DirectoryLoader {
    reader: MeterFileReader,
}

impl DirectoryLoader {
    pub fn new() -> Self {
        Self {
            reader: MeterFileReader::new(),
        }
    }

    pub fn with_reader(reader: MeterFileReader) -> Self {
        Self { reader }
    }

    /// Source files in the directory (non-recursive), sorted by name
    pub fn discover_sources(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(ProcessingError::DataDirectoryNotFound(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if is_source_file(&path) {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }

    /// Load and normalize every source. Per-file failures land in the
    /// returned error log; only a missing directory or an empty overall
    /// result is fatal.
    pub fn load_all(
        &self,
        dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<(UnifiedDataset, ErrorLog)> {
        let files = self.discover_sources(dir)?;
        info!(directory = %dir.display(), files = files.len(), "Loading meter exports");

        if let Some(p) = progress {
            p.set_length(files.len() as u64);
        }

        let mut error_log = ErrorLog::new();
        let mut records = Vec::new();

        for path in &files {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());

            if let Some(p) = progress {
                p.set_message(&format!("Reading {}", name));
            }

            match self.reader.read_source(path) {
                Ok(source) => {
                    debug!(
                        source = %name,
                        kept = source.records.len(),
                        dropped = source.stats.rows_dropped(),
                        "Normalized source"
                    );
                    records.extend(source.records);
                }
                Err(e) => {
                    let entry = ErrorLogEntry::from_source_error(&name, &e);
                    if e.is_skip() {
                        warn!("{}", entry);
                    } else {
                        error!("{}", entry);
                    }
                    error_log.push(entry);
                }
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        if records.is_empty() {
            return Err(ProcessingError::NoValidSources {
                directory: dir.to_path_buf(),
                failed: error_log.len(),
            });
        }

        let dataset = UnifiedDataset::new(records)?;
        info!(
            records = dataset.len(),
            buildings = dataset.buildings().len(),
            failures = error_log.len(),
            "Unified dataset assembled"
        );

        Ok((dataset, error_log))
    }
}

impl Default for DirectoryLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a directory with default normalization settings
pub fn load_all(dir: &Path) -> Result<(UnifiedDataset, ErrorLog)> {
    DirectoryLoader::new().load_all(dir, None)
}
