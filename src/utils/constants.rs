/// Column names recognised in meter exports
pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_KWH: &str = "kwh";
pub const COL_BUILDING: &str = "building";
pub const COL_MONTH: &str = "month";

/// Source file extension (matched case-insensitively)
pub const SOURCE_EXTENSION: &str = "csv";

/// Output file names
pub const CLEANED_DATA_FILE: &str = "cleaned_energy_data.csv";
pub const CLEANED_PARQUET_FILE: &str = "cleaned_energy_data.parquet";
pub const BUILDING_SUMMARY_FILE: &str = "building_summary.csv";
pub const DAILY_TOTALS_FILE: &str = "daily_totals.csv";
pub const WEEKLY_TOTALS_FILE: &str = "weekly_totals.csv";
pub const TEXT_SUMMARY_FILE: &str = "summary.txt";
pub const JSON_SUMMARY_FILE: &str = "summary.json";
pub const DASHBOARD_FILE: &str = "dashboard.svg";

/// Directory defaults
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_CONFIG_FILE: &str = "campus-energy.toml";
pub const ENV_PREFIX: &str = "CAMPUS_ENERGY";

/// Sentinel for "no building" in degenerate summaries
pub const NOT_AVAILABLE: &str = "N/A";

/// Processing defaults
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Chart dimensions (pixels)
pub const DASHBOARD_WIDTH: u32 = 1800;
pub const DASHBOARD_HEIGHT: u32 = 500;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";

pub const SUPPORTED_COMPRESSIONS: [&str; 5] = [
    COMPRESSION_SNAPPY,
    COMPRESSION_GZIP,
    COMPRESSION_LZ4,
    COMPRESSION_ZSTD,
    COMPRESSION_NONE,
];
