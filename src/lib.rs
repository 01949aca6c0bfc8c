// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pbix-lineage
//!
//! Turns the scattered per-report artifacts of a model extraction tool into
//! queryable, de-duplicated lineage datasets.
//!
//! ## Features
//!
//! - **Event Log**: append-only, line-oriented record of every extraction,
//!   parsed back tolerantly (corrupt lines are reported and skipped)
//! - **Provenance Export**: CSV and JSON projections of the event log
//! - **Partition Extraction**: flattens `model.tables[].partitions[]` of
//!   every run's model document into one table
//! - **Classification**: recognizes workbook and connector sources in
//!   partition query expressions and joins them back to the original file
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pbix_lineage::classify::enrich_partitions;
//! use pbix_lineage::eventlog::{parse_log_file, MemorySink};
//! use pbix_lineage::export::ProvenanceTable;
//! use pbix_lineage::partition::extract_partitions;
//!
//! let sink = MemorySink::new();
//! let records = parse_log_file("output/summary_log.txt", &sink)?;
//! let provenance = ProvenanceTable::from_records(records);
//! let partitions = extract_partitions("output", "Model/database.json", &sink)?;
//!
//! for record in enrich_partitions(&partitions, &provenance) {
//!     println!("{} {} {:?}", record.source_file_name, record.partition_type, record.source_location);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌──────────────┐
//! │ extract  │──▶│  event log   │──▶│    export    │──┐ provenance
//! │ (tool)   │   │ write/parse  │   │  CSV / JSON  │  │
//! └────┬─────┘   └──────────────┘   └──────────────┘  ▼
//!      │ run folders ┌──────────────┐            ┌──────────┐   ┌────────┐
//!      └────────────▶│  partition   │───────────▶│ classify │──▶│ output │
//!                    │  extraction  │ partitions └──────────┘   └────────┘
//!                    └──────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and identifiers
pub mod types;

/// Pipeline configuration
pub mod config;

/// Event log writer and parser
pub mod eventlog;

/// Provenance export and join index
pub mod export;

/// Partition extraction from model documents
pub mod partition;

/// Partition classification and enrichment
pub mod classify;

/// CSV/Parquet rendering of enriched partitions
pub mod output;

/// External extraction tool boundary
pub mod extract;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use classify::{enrich_partitions, EnrichedPartitionRecord};
pub use eventlog::{EventLog, EventRecord, LogSink};
pub use export::ProvenanceTable;
pub use partition::{extract_partitions, PartitionRecord};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
