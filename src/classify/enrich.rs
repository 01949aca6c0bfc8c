//! Acceptance filter, provenance join and enriched record type

use super::rules::classify;
use crate::export::ProvenanceTable;
use crate::partition::{PartitionExpression, PartitionRecord};
use crate::types::{PartitionType, RunId, UNKNOWN_SOURCE};
use serde::{Deserialize, Serialize};

/// A partition with recovered source identity and classification.
///
/// Field order is the column order of the enriched document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedPartitionRecord {
    /// Original report file name, or `UNKNOWN`
    #[serde(rename = "pbix_file_name")]
    pub source_file_name: String,
    /// Original report file path, or `UNKNOWN`
    #[serde(rename = "pbix_full_path")]
    pub source_full_path: String,
    /// Run the partition came from
    #[serde(rename = "pbix")]
    pub run_id: RunId,
    /// Declared partition name
    #[serde(rename = "partition_name")]
    pub name: Option<String>,
    /// Declared refresh mode
    #[serde(rename = "partition_mode")]
    pub mode: Option<String>,
    /// Classified source type
    #[serde(rename = "partition_type")]
    pub partition_type: PartitionType,
    /// Workbook path or connection target
    #[serde(rename = "sheet_table_location")]
    pub source_location: Option<String>,
    /// Sheet or table name
    #[serde(rename = "sheet_table_name")]
    pub source_object_name: Option<String>,
    /// Expression as extracted, unchanged
    #[serde(rename = "partition_expression")]
    pub expression: Option<PartitionExpression>,
}

impl EnrichedPartitionRecord {
    /// Column names in document order
    pub const COLUMNS: [&'static str; 9] = [
        "pbix_file_name",
        "pbix_full_path",
        "pbix",
        "partition_name",
        "partition_mode",
        "partition_type",
        "sheet_table_location",
        "sheet_table_name",
        "partition_expression",
    ];

    /// Cell values in column order; absent values are `None` and the
    /// expression is flattened to one newline-joined string
    pub fn cells(&self) -> [Option<String>; 9] {
        [
            Some(self.source_file_name.clone()),
            Some(self.source_full_path.clone()),
            Some(self.run_id.to_string()),
            self.name.clone(),
            self.mode.clone(),
            Some(self.partition_type.to_string()),
            self.source_location.clone(),
            self.source_object_name.clone(),
            self.expression.as_ref().map(PartitionExpression::normalized),
        ]
    }
}

/// Whether normalized expression text looks like a function definition
/// with a named source step
pub fn is_accepted(text: &str) -> bool {
    text.contains("let") && text.contains("Source =")
}

/// Enrich one partition, or `None` when it fails the acceptance filter
pub fn enrich_partition(
    partition: &PartitionRecord,
    provenance: &ProvenanceTable,
) -> Option<EnrichedPartitionRecord> {
    let text = partition.expression_text();
    if !is_accepted(&text) {
        return None;
    }

    let (source_file_name, source_full_path) = match provenance.lookup(&partition.run_id) {
        Some(row) => (row.record.source_name.clone(), row.record.source_path.clone()),
        None => {
            tracing::debug!(run = %partition.run_id, "No provenance row for run");
            (UNKNOWN_SOURCE.to_string(), UNKNOWN_SOURCE.to_string())
        }
    };

    let classification = classify(&text);

    Some(EnrichedPartitionRecord {
        source_file_name,
        source_full_path,
        run_id: partition.run_id.clone(),
        name: partition.name.clone(),
        mode: partition.mode.clone(),
        partition_type: classification.kind,
        source_location: classification.location,
        source_object_name: classification.object_name,
        expression: partition.expression.clone(),
    })
}

/// Enrich every accepted partition, preserving input order
pub fn enrich_partitions(
    partitions: &[PartitionRecord],
    provenance: &ProvenanceTable,
) -> Vec<EnrichedPartitionRecord> {
    let enriched: Vec<_> = partitions
        .iter()
        .filter_map(|p| enrich_partition(p, provenance))
        .collect();

    tracing::info!(
        partitions = partitions.len(),
        accepted = enriched.len(),
        "Classified partitions"
    );
    enriched
}
