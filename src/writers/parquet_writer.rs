use crate::error::{ProcessingError, Result};
use crate::models::MeterRecord;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::DateTime;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

/// Columnar export of the cleaned dataset
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(ProcessingError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write records in batches of `batch_size`
    pub fn write_records_batched(
        &self,
        records: &[MeterRecord],
        path: &Path,
        batch_size: usize,
    ) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let schema = self.create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        for chunk in records.chunks(batch_size.max(1)) {
            let batch = self.records_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;
        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        let fields = vec![
            Field::new("building", DataType::Utf8, false),
            Field::new(
                "timestamp",
                DataType::Timestamp(TimeUnit::Millisecond, None),
                false,
            ),
            Field::new("kwh", DataType::Float64, false),
            Field::new("month", DataType::Utf8, false),
        ];

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(&self, records: &[MeterRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        let buildings: Vec<&str> = records.iter().map(|r| r.building.as_str()).collect();
        let timestamps: Vec<i64> = records
            .iter()
            .map(|r| r.timestamp.and_utc().timestamp_millis())
            .collect();
        let kwh: Vec<f64> = records.iter().map(|r| r.kwh).collect();
        let months: Vec<&str> = records.iter().map(|r| r.month.as_str()).collect();

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(buildings)),
                Arc::new(TimestampMillisecondArray::from(timestamps)),
                Arc::new(Float64Array::from(kwh)),
                Arc::new(StringArray::from(months)),
            ],
        )?;

        Ok(batch)
    }

    /// Read records back, mainly for verification
    pub fn read_records(&self, path: &Path) -> Result<Vec<MeterRecord>> {
        let file = File::open(path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

        let mut records = Vec::new();
        for batch in reader {
            let batch = batch?;

            let buildings = column::<StringArray>(&batch, 0, "building")?;
            let timestamps = column::<TimestampMillisecondArray>(&batch, 1, "timestamp")?;
            let kwh = column::<Float64Array>(&batch, 2, "kwh")?;
            let months = column::<StringArray>(&batch, 3, "month")?;

            for i in 0..batch.num_rows() {
                let timestamp = DateTime::from_timestamp_millis(timestamps.value(i))
                    .ok_or_else(|| {
                        ProcessingError::Config("Invalid timestamp in Parquet file".to_string())
                    })?
                    .naive_utc();

                records.push(
                    MeterRecord::new(timestamp, kwh.value(i), buildings.value(i))
                        .with_month(months.value(i)),
                );
            }
        }

        Ok(records)
    }

    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        Ok(ParquetFileInfo {
            total_rows: metadata.file_metadata().num_rows(),
            row_groups: metadata.num_row_groups(),
            file_size: std::fs::metadata(path)?.len(),
            compression: self.compression,
        })
    }
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, idx: usize, name: &str) -> Result<&'a T> {
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ProcessingError::Config(format!("Invalid {} column type", name)))
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: usize,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::NamedTempFile;

    fn sample() -> Vec<MeterRecord> {
        (1..=3)
            .map(|day| {
                let ts = NaiveDate::from_ymd_opt(2024, 1, day)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap();
                MeterRecord::new(ts, day as f64 * 1.5, "library")
            })
            .collect()
    }

    #[test]
    fn test_write_empty_records() {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new().unwrap();

        assert!(writer.write_records_batched(&[], temp_file.path(), 10).is_ok());
    }

    #[test]
    fn test_write_and_read_back() -> Result<()> {
        let writer = ParquetWriter::new();
        let temp_file = NamedTempFile::new()?;
        let records = sample();

        writer.write_records_batched(&records, temp_file.path(), 2)?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.total_rows, 3);
        assert_eq!(writer.read_records(temp_file.path())?, records);
        Ok(())
    }

    #[test]
    fn test_row_group_size_limits_groups() -> Result<()> {
        let writer = ParquetWriter::new().with_row_group_size(1);
        let temp_file = NamedTempFile::new()?;

        writer.write_records_batched(&sample(), temp_file.path(), 3)?;

        let info = writer.get_file_info(temp_file.path())?;
        assert_eq!(info.row_groups, 3);
        assert!(info.summary().contains("Total rows: 3"));
        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        for compression in ["snappy", "gzip", "lz4", "zstd", "none"] {
            let writer = ParquetWriter::new().with_compression(compression)?;
            let temp_file = NamedTempFile::new()?;

            let result = writer.write_records_batched(&sample(), temp_file.path(), 100);
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        assert!(ParquetWriter::new().with_compression("brotli9").is_err());
        Ok(())
    }
}
