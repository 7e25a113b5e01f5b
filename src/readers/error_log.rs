use serde::Serialize;
use std::fmt;

use crate::error::SourceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// Schema problem; the file was readable
    Skipped,
    NotFound,
    Empty,
    Unreadable,
}

/// One failed source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorLogEntry {
    pub source: String,
    pub kind: FailureKind,
    pub reason: String,
}

impl ErrorLogEntry {
    pub fn from_source_error(source: &str, error: &SourceError) -> Self {
        let kind = match error {
            SourceError::MissingColumn(_) => FailureKind::Skipped,
            SourceError::NotFound => FailureKind::NotFound,
            SourceError::Empty => FailureKind::Empty,
            SourceError::Io(_) | SourceError::Csv(_) => FailureKind::Unreadable,
        };

        Self {
            source: source.to_string(),
            kind,
            reason: error.to_string(),
        }
    }
}

impl fmt::Display for ErrorLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FailureKind::Skipped => write!(f, "File {} {}. Skipped.", self.source, self.reason),
            FailureKind::NotFound => write!(f, "File not found: {}", self.source),
            FailureKind::Empty => write!(f, "Empty or invalid CSV file: {}", self.source),
            FailureKind::Unreadable => write!(f, "Error reading {}: {}", self.source, self.reason),
        }
    }
}

/// Per-file failures collected by the loader, in file iteration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorLog {
    entries: Vec<ErrorLogEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ErrorLogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ErrorLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }
}
