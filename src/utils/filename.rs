use crate::utils::constants::SOURCE_EXTENSION;
use std::path::{Path, PathBuf};

/// Infer a building name from a source path: directory and extension are
/// stripped (e.g. `data/library.csv` -> `library`).
pub fn building_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::trim)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}

/// True for regular files carrying the recognised tabular extension
pub fn is_source_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
}

/// Join an output file name onto the output directory
pub fn output_path(output_dir: &Path, file_name: &str) -> PathBuf {
    output_dir.join(file_name)
}
