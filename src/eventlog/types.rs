//! Event record type

use crate::types::{current_timestamp, final_path_segment, RunId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One logged occurrence of a unit of work.
///
/// Serialized field names are the provenance column names
/// (`datetime, what, file, name, output`) and the declaration order is the
/// provenance column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// `yyyymmdd_hhmm`
    #[serde(rename = "datetime")]
    pub timestamp: String,
    /// Operation tag, e.g. `extract`
    #[serde(rename = "what")]
    pub action: String,
    /// Path to the original input file
    #[serde(rename = "file")]
    pub source_path: String,
    /// Final segment of `source_path`
    #[serde(rename = "name")]
    pub source_name: String,
    /// Per-run output directory
    #[serde(rename = "output")]
    pub output_folder: String,
}

impl EventRecord {
    /// Column names in provenance order
    pub const COLUMNS: [&'static str; 5] = ["datetime", "what", "file", "name", "output"];

    /// Create a record stamped with the current time.
    ///
    /// `source_name` is derived from `source_path`.
    pub fn new(
        action: impl Into<String>,
        source_path: impl Into<String>,
        output_folder: impl Into<String>,
    ) -> Self {
        Self::at(current_timestamp(), action, source_path, output_folder)
    }

    /// Create a record with an explicit timestamp
    pub fn at(
        timestamp: impl Into<String>,
        action: impl Into<String>,
        source_path: impl Into<String>,
        output_folder: impl Into<String>,
    ) -> Self {
        let source_path = source_path.into();
        let source_name = final_path_segment(&source_path).to_string();
        Self {
            timestamp: timestamp.into(),
            action: action.into(),
            source_path,
            source_name,
            output_folder: output_folder.into(),
        }
    }

    /// Run this record belongs to
    pub fn run_id(&self) -> RunId {
        RunId::from_folder_path(&self.output_folder)
    }

    /// Field values in provenance column order
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.timestamp,
            &self.action,
            &self.source_path,
            &self.source_name,
            &self.output_folder,
        ]
    }

    /// Build a record from values in provenance column order
    pub fn from_fields(fields: [String; 5]) -> Self {
        let [timestamp, action, source_path, source_name, output_folder] = fields;
        Self {
            timestamp,
            action,
            source_path,
            source_name,
            output_folder,
        }
    }
}

/// Renders the event log line (without trailing newline)
impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"{} : what="{}", file="{}", name="{}", output="{}""#,
            self.timestamp, self.action, self.source_path, self.source_name, self.output_folder
        )
    }
}
