use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data directory not found: {}", .0.display())]
    DataDirectoryNotFound(PathBuf),

    #[error("No valid CSV files were loaded from {} ({failed} source(s) failed)", directory.display())]
    NoValidSources { directory: PathBuf, failed: usize },

    #[error("Unified dataset cannot be empty")]
    EmptyDataset,

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Failure confined to a single source file. The loader records these in the
/// error log and moves on to the next file.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("missing '{0}' column")]
    MissingColumn(&'static str),

    #[error("empty or invalid CSV file")]
    Empty,

    #[error("file not found")]
    NotFound,

    #[error("read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl SourceError {
    /// Schema problems skip the file; everything else is a read failure.
    pub fn is_skip(&self) -> bool {
        matches!(self, SourceError::MissingColumn(_))
    }
}
