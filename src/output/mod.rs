//! Output module
//!
//! Tabular rendering of enriched partition records.
//!
//! # Overview
//!
//! One row per record, columns in enriched-document order. Multi-line
//! expressions are flattened to one cell with embedded line breaks.
//!
//! - CSV (RFC 4180 quoting)
//! - Parquet via an all-Utf8 Arrow schema

mod schema;
mod writer;

pub use schema::{enriched_schema, enriched_to_arrow};
pub use writer::{write_batch_to_parquet, write_enriched_csv, write_enriched_parquet};
