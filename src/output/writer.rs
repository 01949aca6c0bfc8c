//! Tabular writers
//!
//! Parquet and CSV rendering of enriched records. Both rewrite their
//! target file.

use super::schema::enriched_to_arrow;
use crate::classify::EnrichedPartitionRecord;
use crate::error::{Error, Result};
use crate::export::write_csv;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::path::Path;

/// Writer properties for every Parquet artifact
fn writer_properties() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Write a single RecordBatch to a Parquet file, returning the row count
pub fn write_batch_to_parquet(path: impl AsRef<Path>, batch: &RecordBatch) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        Error::output(format!("Failed to create '{}': {e}", path.display()))
    })?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(writer_properties()))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(batch.num_rows())
}

/// Render enriched records as a Parquet file
pub fn write_enriched_parquet(
    records: &[EnrichedPartitionRecord],
    path: impl AsRef<Path>,
) -> Result<usize> {
    let batch = enriched_to_arrow(records)?;
    write_batch_to_parquet(path, &batch)
}

/// Render enriched records as a CSV file (absent values as empty cells)
pub fn write_enriched_csv(
    records: &[EnrichedPartitionRecord],
    path: impl AsRef<Path>,
) -> Result<usize> {
    let rows = records
        .iter()
        .map(|r| r.cells().map(Option::unwrap_or_default));
    let content = write_csv(&EnrichedPartitionRecord::COLUMNS, rows);

    let path = path.as_ref();
    fs::write(path, content)
        .map_err(|e| Error::output(format!("Failed to write '{}': {e}", path.display())))?;
    Ok(records.len())
}
