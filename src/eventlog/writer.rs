//! Log aggregator
//!
//! Owns the append handles of the output area. Each append writes exactly
//! one line and flushes before returning.

use super::types::EventRecord;
use crate::error::{Error, Result};
use crate::types::current_timestamp;
use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Destination for progress and error diagnostics.
///
/// Reporting a diagnostic never fails the caller; a sink that cannot
/// persist a line falls back to `tracing`.
pub trait LogSink {
    /// Report progress
    fn progress(&self, message: &str);

    /// Report an error that only affects the current unit of work
    fn error(&self, message: &str);
}

/// Append-only log files of one output area
#[derive(Debug)]
pub struct EventLog {
    /// Event record stream
    records: File,
    /// Progress stream
    progress: File,
    /// Error stream
    errors: File,
    /// Path of the event record stream
    records_path: PathBuf,
    /// Timestamp source
    clock: fn() -> String,
}

impl EventLog {
    /// Open (creating if needed) the three log files inside `dir`
    pub fn open(
        dir: impl AsRef<Path>,
        records_name: &str,
        progress_name: &str,
        errors_name: &str,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            Error::event_log(format!(
                "Failed to create output directory '{}': {e}",
                dir.display()
            ))
        })?;

        let records_path = dir.join(records_name);
        Ok(Self {
            records: open_append(&records_path)?,
            progress: open_append(&dir.join(progress_name))?,
            errors: open_append(&dir.join(errors_name))?,
            records_path,
            clock: current_timestamp,
        })
    }

    /// Replace the timestamp source
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    /// Path of the event record stream
    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    /// Append one event record
    ///
    /// A field the parser could not read back (empty, or containing a quote
    /// or line break) is rejected before anything is written.
    pub fn record(&self, record: &EventRecord) -> Result<()> {
        check_loggable(record)?;
        append_line(&self.records, &record.to_string())
            .map_err(|e| Error::event_log(format!("Failed to append event record: {e}")))?;
        tracing::debug!(run = %record.run_id(), action = %record.action, "Recorded event");
        Ok(())
    }

    /// Append a record for `action` on `source_path` stamped with this log's clock
    pub fn record_action(
        &self,
        action: &str,
        source_path: &str,
        output_folder: &str,
    ) -> Result<EventRecord> {
        let record = EventRecord::at((self.clock)(), action, source_path, output_folder);
        self.record(&record)?;
        Ok(record)
    }

    fn stamped(&self, message: &str) -> String {
        format!("{} : {}", (self.clock)(), message)
    }
}

impl LogSink for EventLog {
    fn progress(&self, message: &str) {
        tracing::info!("{message}");
        if let Err(e) = append_line(&self.progress, &self.stamped(message)) {
            tracing::warn!("Failed to write progress log: {e}");
        }
    }

    fn error(&self, message: &str) {
        tracing::warn!("{message}");
        let line = self.stamped(&format!("ERROR : {message}"));
        // Errors are mirrored into the progress stream
        for file in [&self.errors, &self.progress] {
            if let Err(e) = append_line(file, &line) {
                tracing::warn!("Failed to write error log: {e}");
            }
        }
    }
}

/// Sink collecting diagnostics in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    progress: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress messages reported so far
    pub fn progress_messages(&self) -> Vec<String> {
        self.progress.borrow().clone()
    }

    /// Error messages reported so far
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl LogSink for MemorySink {
    fn progress(&self, message: &str) {
        self.progress.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

fn check_loggable(record: &EventRecord) -> Result<()> {
    for (column, value) in EventRecord::COLUMNS.iter().zip(record.fields()) {
        if value.is_empty() || value.contains(['"', '\n', '\r']) {
            return Err(Error::event_log(format!(
                "Cannot log {column} value {value:?}: empty or contains a quote or line break"
            )));
        }
    }
    Ok(())
}

fn open_append(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::event_log(format!("Failed to open '{}': {e}", path.display())))
}

fn append_line(mut file: &File, line: &str) -> std::io::Result<()> {
    writeln!(file, "{line}")?;
    file.flush()
}
