//! Tabular export module
//!
//! Transcodes parsed event records into the provenance artifacts and loads
//! them back as a join index.
//!
//! # Overview
//!
//! - Row-oriented table (CSV) with a header row and a fixed column order
//! - Document-oriented array of objects (JSON)
//! - [`ProvenanceTable`]: rows keyed by [`RunId`](crate::types::RunId) for enrichment
//!
//! Every write is a full rewrite of its target; record order is preserved
//! and nothing is merged or deduplicated.

mod csv;
mod provenance;

pub use self::csv::{parse_csv, write_csv, CsvTable};
pub use provenance::{
    export_provenance, write_provenance_csv, write_provenance_json, write_json_document,
    ProvenanceRow, ProvenanceTable,
};
