//! CLI module
//!
//! Command-line interface for the lineage pipeline.
//!
//! # Commands
//!
//! - `extract` - Run the extraction tool over every input report
//! - `export` - Parse the event log into the provenance CSV/JSON
//! - `partitions` - Flatten model documents into the partition summary
//! - `classify` - Classify partitions and join them to provenance
//! - `tables` - Index per-table model files
//! - `run` - export → partitions → classify in one pass
//! - `reset` - Clear the output area

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
