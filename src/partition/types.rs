//! Partition record types

use crate::types::RunId;
use serde::{Deserialize, Serialize};

/// Query expression body of a partition.
///
/// Model documents store multi-line expressions either as one string or as
/// an ordered array of lines; every form is carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartitionExpression {
    /// Whole expression as one string
    Text(String),
    /// Expression split into lines
    Lines(Vec<String>),
    /// Line array that also holds non-string items, kept as found
    Mixed(Vec<serde_json::Value>),
}

impl PartitionExpression {
    /// Build from a JSON value, accepting a string or an array.
    ///
    /// Anything else is not an expression.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::Text(s.clone())),
            serde_json::Value::Array(items) => {
                let lines: Option<Vec<String>> =
                    items.iter().map(|v| v.as_str().map(String::from)).collect();
                Some(match lines {
                    Some(lines) => Self::Lines(lines),
                    None => Self::Mixed(items.clone()),
                })
            }
            _ => None,
        }
    }

    /// Single text blob; lines are joined with `\n`.
    ///
    /// Only the string items of a mixed array contribute text.
    pub fn normalized(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Lines(lines) => lines.join("\n"),
            Self::Mixed(items) => items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl From<&str> for PartitionExpression {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One partition found in one run's model document.
///
/// The table the partition belongs to is not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionRecord {
    /// Run the partition was extracted from
    #[serde(rename = "pbix")]
    pub run_id: RunId,
    /// Declared partition name
    #[serde(rename = "partition_name")]
    pub name: Option<String>,
    /// Declared refresh mode
    #[serde(rename = "partition_mode")]
    pub mode: Option<String>,
    /// Query expression body
    #[serde(rename = "partition_expression")]
    pub expression: Option<PartitionExpression>,
}

impl PartitionRecord {
    /// Create a record with no name, mode or expression
    pub fn new(run_id: impl Into<RunId>) -> Self {
        Self {
            run_id: run_id.into(),
            name: None,
            mode: None,
            expression: None,
        }
    }

    /// Set the partition name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the refresh mode
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Set the expression
    #[must_use]
    pub fn with_expression(mut self, expression: impl Into<PartitionExpression>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    /// Normalized expression text, empty when the partition has none
    pub fn expression_text(&self) -> String {
        self.expression
            .as_ref()
            .map(PartitionExpression::normalized)
            .unwrap_or_default()
    }
}
