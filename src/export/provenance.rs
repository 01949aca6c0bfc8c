//! Provenance artifacts and join index

use super::csv::{parse_csv, write_csv};
use crate::error::{Error, Result, ResultExt};
use crate::eventlog::EventRecord;
use crate::types::RunId;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// An event record keyed by the run it produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceRow {
    /// Join key (final segment of the record's output folder)
    pub run_id: RunId,
    /// The projected record
    pub record: EventRecord,
}

impl From<EventRecord> for ProvenanceRow {
    fn from(record: EventRecord) -> Self {
        Self {
            run_id: record.run_id(),
            record,
        }
    }
}

/// Provenance rows indexed by run id.
///
/// One run is expected to produce one row. Should a run appear more than
/// once, lookups resolve to the first row in input order.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceTable {
    rows: Vec<ProvenanceRow>,
    index: HashMap<RunId, usize>,
}

impl ProvenanceTable {
    /// Build the table from records in append order
    pub fn from_records(records: impl IntoIterator<Item = EventRecord>) -> Self {
        let mut table = Self::default();
        for record in records {
            let row = ProvenanceRow::from(record);
            table.index.entry(row.run_id.clone()).or_insert(table.rows.len());
            table.rows.push(row);
        }
        table
    }

    /// Load a table from the JSON provenance document
    pub fn from_json(content: &str) -> Result<Self> {
        let records: Vec<EventRecord> = serde_json::from_str(content)?;
        Ok(Self::from_records(records))
    }

    /// Load a table from the CSV provenance table.
    ///
    /// Columns are matched by header name, so column order is not significant.
    pub fn from_csv(content: &str) -> Result<Self> {
        let table = parse_csv(content)?;
        if table.header.is_empty() {
            return Ok(Self::default());
        }

        let mut positions = [0usize; 5];
        for (slot, column) in positions.iter_mut().zip(EventRecord::COLUMNS) {
            *slot = table
                .header
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| Error::csv(format!("missing column '{column}'")))?;
        }

        let records = table.rows.into_iter().map(|row| {
            EventRecord::from_fields(positions.map(|pos| row[pos].clone()))
        });
        Ok(Self::from_records(records))
    }

    /// Load from a file; `.csv` files use the row-oriented reader, anything
    /// else is read as the JSON document
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }
        let content = fs::read_to_string(path).context("Failed to read provenance table")?;

        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if is_csv {
            Self::from_csv(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// First row recorded for `run_id`
    pub fn lookup(&self, run_id: &RunId) -> Option<&ProvenanceRow> {
        self.index.get(run_id).map(|&i| &self.rows[i])
    }

    /// All rows in input order
    pub fn rows(&self) -> &[ProvenanceRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// Writers
// ============================================================================

/// Rewrite the CSV provenance table
pub fn write_provenance_csv(records: &[EventRecord], path: impl AsRef<Path>) -> Result<usize> {
    let content = write_csv(&EventRecord::COLUMNS, records.iter().map(|r| r.fields()));
    write_artifact(path.as_ref(), &content)?;
    Ok(records.len())
}

/// Rewrite the JSON provenance document
pub fn write_provenance_json(records: &[EventRecord], path: impl AsRef<Path>) -> Result<usize> {
    write_json_document(records, path)
}

/// Rewrite a JSON array-of-objects artifact (2-space indentation)
pub fn write_json_document<T: Serialize>(items: &[T], path: impl AsRef<Path>) -> Result<usize> {
    let content = serde_json::to_string_pretty(items)?;
    write_artifact(path.as_ref(), &content)?;
    Ok(items.len())
}

/// Write both provenance artifacts and return the join index
pub fn export_provenance(
    records: Vec<EventRecord>,
    csv_path: impl AsRef<Path>,
    json_path: impl AsRef<Path>,
) -> Result<ProvenanceTable> {
    write_provenance_csv(&records, &csv_path)?;
    write_provenance_json(&records, &json_path)?;
    tracing::info!(
        records = records.len(),
        csv = %csv_path.as_ref().display(),
        json = %json_path.as_ref().display(),
        "Exported provenance"
    );
    Ok(ProvenanceTable::from_records(records))
}

fn write_artifact(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::output(format!("Failed to write '{}': {e}", path.display())))
}
