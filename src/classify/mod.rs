//! Partition classification and enrichment
//!
//! Decides which partitions are query-language function definitions,
//! classifies their source, and joins them back to the provenance table.
//!
//! # Overview
//!
//! For each raw [`PartitionRecord`](crate::partition::PartitionRecord):
//!
//! 1. The expression is normalized to one text blob
//! 2. Only expressions containing both `let` and `Source =` are kept;
//!    everything else (calculated, native-query partitions) is dropped
//! 3. The run id is looked up in the [`ProvenanceTable`](crate::export::ProvenanceTable);
//!    a miss yields the `UNKNOWN` sentinel for both source fields
//! 4. The ordered [`RULES`] are tried, first match wins
//!
//! Nothing in this module fails on a single record.

mod enrich;
mod patterns;
mod rules;

pub use enrich::{enrich_partition, enrich_partitions, is_accepted, EnrichedPartitionRecord};
pub use patterns::{
    connector_contents_target, file_contents_path, item_name, name_assignment,
};
pub use rules::{classify, Classification, ClassificationRule, RULES};
