pub mod constants;
pub mod filename;
pub mod progress;
pub mod timestamp;

pub use constants::*;
pub use filename::{building_name_from_path, is_source_file, output_path};
pub use progress::ProgressReporter;
pub use timestamp::{month_label, parse_timestamp};
