//! Arrow schema for enriched partition records

use crate::classify::EnrichedPartitionRecord;
use crate::error::Result;
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// One nullable Utf8 column per enriched field
pub fn enriched_schema() -> Schema {
    let fields: Vec<Field> = EnrichedPartitionRecord::COLUMNS
        .iter()
        .map(|name| Field::new(*name, DataType::Utf8, true))
        .collect();
    Schema::new(fields)
}

/// Convert enriched records into a single RecordBatch
pub fn enriched_to_arrow(records: &[EnrichedPartitionRecord]) -> Result<RecordBatch> {
    let rows: Vec<_> = records.iter().map(EnrichedPartitionRecord::cells).collect();

    let columns: Vec<ArrayRef> = (0..EnrichedPartitionRecord::COLUMNS.len())
        .map(|col| {
            let values: Vec<Option<String>> = rows.iter().map(|row| row[col].clone()).collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(Arc::new(enriched_schema()), columns)?;
    Ok(batch)
}
