//! Partition extraction module
//!
//! Flattens the `model.tables[].partitions[]` hierarchy of every run's
//! model-definition document into one list of [`PartitionRecord`]s.
//!
//! # Overview
//!
//! - Absent keys default to empty collections: a table without
//!   `partitions` contributes nothing and is not an error
//! - A document that cannot be read or parsed is reported and its run is
//!   skipped; extraction continues with the next run folder
//! - Run folders are visited in sorted name order, then tables and
//!   partitions in document order
//!
//! The per-table model files (`*.tmdl`) can be indexed with
//! [`index_table_files`].

mod extractor;
mod tables;
mod types;

pub use extractor::{extract_partitions, list_run_folders, partitions_from_document};
pub use tables::{index_table_files, TableFileEntry};
pub use types::{PartitionExpression, PartitionRecord};
