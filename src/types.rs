//! Common types used throughout pbix-lineage
//!
//! This module contains shared identifiers, constants and small helpers
//! used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Sentinel written for source identity when a run has no provenance row
pub const UNKNOWN_SOURCE: &str = "UNKNOWN";

/// `chrono` format of event and progress timestamps (minute resolution)
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";

/// Current local time formatted as `yyyymmdd_hhmm`
pub fn current_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

// ============================================================================
// Run Identity
// ============================================================================

/// Identifier of one extraction run, equal to the name of its output folder.
///
/// Assigned once when the run folder is created and used as the join key
/// between the provenance table and the extracted partitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Create a run id from a folder name
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the run id from an output folder path (its final segment)
    pub fn from_folder_path(path: &str) -> Self {
        Self(final_path_segment(path).to_string())
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Final segment of a path string, accepting both `/` and `\` separators.
///
/// Paths recorded in the event log may come from another platform, so
/// `std::path::Path` cannot be relied on to split them.
pub fn final_path_segment(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    match trimmed.rfind(['/', '\\']) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

// ============================================================================
// Partition Classification
// ============================================================================

/// Semantic origin of a partition's query expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionType {
    /// Spreadsheet workbook source
    Excel,
    /// Connector call ending in `.Contents(` (relational database and similar)
    Database,
    /// No recognized source pattern
    #[default]
    Unknown,
}

impl PartitionType {
    /// Lowercase label used in output documents
    pub fn as_str(self) -> &'static str {
        match self {
            PartitionType::Excel => "excel",
            PartitionType::Database => "database",
            PartitionType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PartitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
