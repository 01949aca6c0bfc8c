//! Ordered source-type rules

use super::patterns::{connector_contents_target, file_contents_path, item_name, name_assignment};
use crate::types::PartitionType;

/// A source-type rule: when `marker` occurs in the expression, the partition
/// has type `kind` and its location and object name come from the two
/// extractors
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    /// Type assigned on match
    pub kind: PartitionType,
    /// Literal substring that selects this rule
    pub marker: &'static str,
    /// Extracts the file path or connection target
    pub location: fn(&str) -> Option<String>,
    /// Extracts the sheet or table name
    pub object_name: fn(&str) -> Option<String>,
}

/// Rules in precedence order; the first rule whose marker occurs wins.
///
/// The `.Contents(` marker is a widening heuristic rather than a closed
/// list of database connectors: any connector call ending in `.Contents(`
/// that is not a workbook lands here, which is why the workbook rule must
/// come first.
pub static RULES: [ClassificationRule; 2] = [
    ClassificationRule {
        kind: PartitionType::Excel,
        marker: "Excel.Workbook",
        location: file_contents_path,
        object_name: item_name,
    },
    ClassificationRule {
        kind: PartitionType::Database,
        marker: ".Contents(",
        location: connector_contents_target,
        object_name: name_assignment,
    },
];

/// Outcome of classifying one expression
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    /// Source type
    pub kind: PartitionType,
    /// File path or connection target, when found
    pub location: Option<String>,
    /// Sheet or table name, when found
    pub object_name: Option<String>,
}

/// Classify normalized expression text against [`RULES`].
///
/// Extraction is best-effort: a rule that matches but whose extractors find
/// nothing still decides the type.
pub fn classify(text: &str) -> Classification {
    RULES
        .iter()
        .find(|rule| text.contains(rule.marker))
        .map(|rule| Classification {
            kind: rule.kind,
            location: (rule.location)(text),
            object_name: (rule.object_name)(text),
        })
        .unwrap_or_default()
}
