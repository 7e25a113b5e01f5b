use crate::error::Result;
use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_BATCH_SIZE, DEFAULT_CONFIG_FILE, DEFAULT_DATA_DIR,
    DEFAULT_OUTPUT_DIR, DEFAULT_ROW_GROUP_SIZE, ENV_PREFIX, SUPPORTED_COMPRESSIONS,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use validator::{Validate, ValidationError};

/// Run settings. Layered as defaults, then the config file, then
/// `CAMPUS_ENERGY_*` environment variables; CLI flags are applied last by
/// the caller.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct DashboardConfig {
    #[validate(length(min = 1))]
    pub data_dir: String,

    #[validate(length(min = 1))]
    pub output_dir: String,

    pub allow_negative_kwh: bool,

    pub write_chart: bool,

    pub write_parquet: bool,

    #[validate(custom(function = "validate_compression"))]
    pub compression: String,

    #[validate(range(min = 1))]
    pub batch_size: usize,

    #[validate(range(min = 1))]
    pub row_group_size: usize,
}

fn validate_compression(compression: &str) -> std::result::Result<(), ValidationError> {
    if SUPPORTED_COMPRESSIONS.contains(&compression.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ValidationError::new("unsupported_compression"))
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            allow_negative_kwh: false,
            write_chart: true,
            write_parquet: false,
            compression: COMPRESSION_SNAPPY.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }
}

impl DashboardConfig {
    /// Load settings. An explicit `path` must exist; otherwise
    /// `campus-energy.toml` in the working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();

        let file = match path {
            Some(p) => File::from(p.to_path_buf()).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .set_default("data_dir", defaults.data_dir)?
            .set_default("output_dir", defaults.output_dir)?
            .set_default("allow_negative_kwh", defaults.allow_negative_kwh)?
            .set_default("write_chart", defaults.write_chart)?
            .set_default("write_parquet", defaults.write_parquet)?
            .set_default("compression", defaults.compression)?
            .set_default("batch_size", defaults.batch_size as u64)?
            .set_default("row_group_size", defaults.row_group_size as u64)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.output_dir, "output");
    }

    #[test]
    fn test_invalid_settings() {
        let config = DashboardConfig {
            compression: "brotli".to_string(),
            batch_size: 0,
            row_group_size: 0,
            ..DashboardConfig::default()
        };
        let errors = config.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("compression"));
        assert!(fields.contains_key("batch_size"));
        assert!(fields.contains_key("row_group_size"));
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "data_dir = \"meters\"\nwrite_parquet = true\ncompression = \"zstd\"\nrow_group_size = 500\n",
        )?;

        let config = DashboardConfig::load(Some(&path))?;
        assert_eq!(config.data_dir, "meters");
        assert!(config.write_parquet);
        assert_eq!(config.compression, "zstd");
        assert_eq!(config.row_group_size, 500);
        // Untouched keys keep their defaults
        assert_eq!(config.output_dir, "output");
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        Ok(())
    }

    #[test]
    fn test_invalid_file_values_are_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "output_dir = \"\"\n")?;

        assert!(matches!(
            DashboardConfig::load(Some(&path)),
            Err(ProcessingError::Validation(_))
        ));
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file() {
        let result = DashboardConfig::load(Some(Path::new("/no/such/settings.toml")));
        assert!(matches!(result, Err(ProcessingError::ConfigSource(_))));
    }
}
