//! Model document walker

use super::types::{PartitionExpression, PartitionRecord};
use crate::error::{Error, Result};
use crate::eventlog::LogSink;
use crate::types::RunId;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Run folders directly under `root`, sorted by name.
///
/// Plain files in `root` (the summary artifacts) are ignored.
pub fn list_run_folders(root: impl AsRef<Path>) -> Result<Vec<(RunId, PathBuf)>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(Error::file_not_found(root.display().to_string()));
    }

    let mut folders = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            folders.push((RunId::new(name), path.clone()));
        }
    }
    folders.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(folders)
}

/// Flatten one parsed model document.
///
/// Every missing or mistyped level degrades to "no partitions".
pub fn partitions_from_document(run_id: &RunId, document: &Value) -> Vec<PartitionRecord> {
    let tables = document
        .get("model")
        .and_then(|m| m.get("tables"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    tables
        .iter()
        .flat_map(|table| {
            table
                .get("partitions")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default()
        })
        .map(|part| PartitionRecord {
            run_id: run_id.clone(),
            name: string_field(part, "name"),
            mode: string_field(part, "mode"),
            expression: part
                .get("source")
                .and_then(|s| s.get("expression"))
                .and_then(PartitionExpression::from_json),
        })
        .collect()
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

fn read_document(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::model_document(path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&content)
        .map_err(|e| Error::model_document(path.display().to_string(), e.to_string()))
}

/// Extract partitions from every run folder under `root`.
///
/// `model_document` is the document's location relative to a run folder.
/// Runs without a document are skipped silently (extraction may not have
/// produced a model); unreadable documents are reported to `sink`.
pub fn extract_partitions(
    root: impl AsRef<Path>,
    model_document: impl AsRef<Path>,
    sink: &dyn LogSink,
) -> Result<Vec<PartitionRecord>> {
    let mut records = Vec::new();

    for (run_id, folder) in list_run_folders(root)? {
        let doc_path = folder.join(model_document.as_ref());
        if !doc_path.is_file() {
            tracing::debug!(run = %run_id, "No model document, skipping");
            continue;
        }

        match read_document(&doc_path) {
            Ok(document) => {
                let found = partitions_from_document(&run_id, &document);
                tracing::debug!(run = %run_id, partitions = found.len(), "Extracted partitions");
                records.extend(found);
            }
            Err(e) => sink.error(&format!("Error reading {}: {e}", doc_path.display())),
        }
    }

    Ok(records)
}
