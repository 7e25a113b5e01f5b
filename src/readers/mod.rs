pub mod directory_loader;
pub mod error_log;
pub mod meter_reader;

pub use directory_loader::{load_all, DirectoryLoader};
pub use error_log::{ErrorLog, ErrorLogEntry, FailureKind};
pub use meter_reader::{MeterFileReader, NormalizedSource, RowStats};
