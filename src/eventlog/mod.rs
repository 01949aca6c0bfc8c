//! Event log module
//!
//! Writing and parsing of the append-only event log.
//!
//! # Overview
//!
//! One line is appended per successful unit of work:
//!
//! ```text
//! 20240131_0915 : what="extract", file="C:\reports\Sales.pbix", name="Sales.pbix", output="output\Sales_0a1b2c3d"
//! ```
//!
//! The [`EventLog`] aggregator owns the append handles of the output area
//! (event records, progress, errors) and is handed to other components as a
//! [`LogSink`]. The [`parse_log`] side decodes the record stream back into
//! [`EventRecord`]s, reporting every malformed line as a diagnostic.

mod parser;
mod types;
mod writer;

pub use parser::{
    parse_line, parse_log, parse_log_bytes, parse_log_file, LineDiagnostic, ParsedLog,
};
pub use types::EventRecord;
pub use writer::{EventLog, LogSink, MemorySink};

#[cfg(test)]
mod tests;
