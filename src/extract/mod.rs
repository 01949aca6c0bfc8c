//! Extraction boundary
//!
//! Everything that touches the outside world before the log-to-record
//! pipeline runs: finding report files, assigning each a run folder,
//! invoking the external extraction executable, and resetting the output
//! area.

mod discovery;
mod folder;
mod tool;

pub use discovery::discover_inputs;
pub use folder::{clear_output_area, create_run_folder, run_id_for, RunFolder};
pub use tool::{extract_all, ExtractionSummary, ExtractionTool};
