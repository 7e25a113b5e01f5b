use crate::error::SourceError;
use crate::models::{MeterRecord, RawRecord, RowRejection};
use crate::utils::constants::{COL_BUILDING, COL_KWH, COL_MONTH, COL_TIMESTAMP};
use crate::utils::filename::building_name_from_path;
use csv::{ReaderBuilder, StringRecord, Trim};
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Column positions resolved from a source header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceSchema {
    timestamp: usize,
    kwh: usize,
    building: Option<usize>,
    month: Option<usize>,
}

impl SourceSchema {
    fn resolve(headers: &StringRecord) -> Result<Self, SourceError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let kwh = find(COL_KWH).ok_or(SourceError::MissingColumn(COL_KWH))?;
        let timestamp = find(COL_TIMESTAMP).ok_or(SourceError::MissingColumn(COL_TIMESTAMP))?;

        Ok(Self {
            timestamp,
            kwh,
            building: find(COL_BUILDING),
            month: find(COL_MONTH),
        })
    }

    fn raw_record(&self, row: &StringRecord) -> RawRecord {
        // Short rows are padded with blanks
        let cell = |idx: usize| Some(row.get(idx).unwrap_or("").to_string());

        RawRecord {
            timestamp: cell(self.timestamp),
            kwh: cell(self.kwh),
            building: self.building.and_then(cell),
            month: self.month.and_then(cell),
        }
    }
}

/// Row accounting for one source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowStats {
    pub rows_read: usize,
    pub malformed_rows: usize,
    pub bad_timestamps: usize,
    pub bad_kwh: usize,
    pub missing_building: usize,
}

impl RowStats {
    pub fn rows_dropped(&self) -> usize {
        self.malformed_rows + self.bad_timestamps + self.bad_kwh + self.missing_building
    }

    fn reject(&mut self, reason: RowRejection) {
        match reason {
            RowRejection::UnparseableTimestamp => self.bad_timestamps += 1,
            RowRejection::InvalidKwh | RowRejection::NegativeKwh => self.bad_kwh += 1,
            RowRejection::MissingBuilding => self.missing_building += 1,
        }
    }
}

/// Normalized rows of one source file
#[derive(Debug, Clone)]
pub struct NormalizedSource {
    pub source: String,
    pub records: Vec<MeterRecord>,
    pub inferred_building: Option<String>,
    pub stats: RowStats,
}

/// Reads one meter export and normalizes it into `MeterRecord`s
pub struct MeterFileReader {
    allow_negative_kwh: bool,
}

impl MeterFileReader {
    pub fn new() -> Self {
        Self {
            allow_negative_kwh: false,
        }
    }

    pub fn with_allow_negative_kwh(allow_negative_kwh: bool) -> Self {
        Self { allow_negative_kwh }
    }

    /// Read and normalize a file from disk
    pub fn read_source(&self, path: &Path) -> Result<NormalizedSource, SourceError> {
        let bytes = fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SourceError::NotFound,
            _ => SourceError::Io(e),
        })?;

        let content = decode_source(&bytes);
        self.normalize(&content, &path.to_string_lossy())
    }

    /// Normalize tabular text. `source_name` is the source identifier; when
    /// the table has no building column every row gets the building name
    /// inferred from it.
    pub fn normalize(&self, content: &str, source_name: &str) -> Result<NormalizedSource, SourceError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(content.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(SourceError::Empty);
        }

        let schema = SourceSchema::resolve(&headers)?;
        let inferred_building = match schema.building {
            Some(_) => None,
            None => building_name_from_path(Path::new(source_name)),
        };

        let mut stats = RowStats::default();
        let mut records = Vec::new();

        for row in reader.records() {
            stats.rows_read += 1;

            // Undecodable or over-long lines are skipped, not fatal
            let row = match row {
                Ok(row) if row.len() <= headers.len() => row,
                _ => {
                    stats.malformed_rows += 1;
                    continue;
                }
            };

            match schema
                .raw_record(&row)
                .normalize(inferred_building.as_deref(), self.allow_negative_kwh)
            {
                Ok(record) => records.push(record),
                Err(reason) => stats.reject(reason),
            }
        }

        Ok(NormalizedSource {
            source: source_name.to_string(),
            records,
            inferred_building,
            stats,
        })
    }
}

impl Default for MeterFileReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode raw bytes, honouring a BOM. Invalid UTF-8 without a BOM is read as
/// Windows-1252, the usual encoding of spreadsheet-exported meter data.
fn decode_source(bytes: &[u8]) -> String {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let body = &bytes[bom_len..];

    if encoding == UTF_8 {
        if let Ok(text) = std::str::from_utf8(body) {
            return text.to_string();
        }
        let (text, _, _) = WINDOWS_1252.decode(body);
        return text.into_owned();
    }

    let (text, _) = encoding.decode_without_bom_handling(body);
    text.into_owned()
}
