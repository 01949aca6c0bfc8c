//! Event log parser
//!
//! Tolerant of partial corruption: a line that does not match the grammar
//! yields a diagnostic and is skipped, and parsing continues to the end of
//! the input. Lines are never repaired.

use super::types::EventRecord;
use super::writer::LogSink;
use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// `<yyyymmdd_hhmm> : what="..", file="..", name="..", output=".."`
static LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(\d{8}_\d{4}) : what="([^"]+)", file="([^"]+)", name="([^"]+)", output="([^"]+)"\s*$"#,
    )
    .unwrap()
});

/// A line that failed to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based line number
    pub line_number: usize,
    /// Offending line content
    pub line: String,
}

impl LineDiagnostic {
    /// Message reported to the log sink
    pub fn message(&self) -> String {
        format!(
            "Failed to parse line {}: {}",
            self.line_number,
            self.line.trim()
        )
    }
}

/// Result of parsing a whole log
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    /// Records in append order
    pub records: Vec<EventRecord>,
    /// One entry per malformed line
    pub diagnostics: Vec<LineDiagnostic>,
}

/// Parse a single log line
pub fn parse_line(line: &str) -> Option<EventRecord> {
    let caps = LINE_REGEX.captures(line)?;
    let field = |i: usize| caps[i].to_string();
    Some(EventRecord::from_fields([
        field(1),
        field(2),
        field(3),
        field(4),
        field(5),
    ]))
}

/// Parse log content into records and diagnostics
pub fn parse_log(content: &str) -> ParsedLog {
    parse_log_bytes(content.as_bytes())
}

/// Parse raw log bytes line by line.
///
/// Lines are decoded independently, so a line that is not valid UTF-8 is
/// one more malformed line rather than a failure of the whole log.
pub fn parse_log_bytes(content: &[u8]) -> ParsedLog {
    let mut parsed = ParsedLog::default();
    if content.is_empty() {
        return parsed;
    }

    let body = content.strip_suffix(b"\n").unwrap_or(content);
    for (idx, raw) in body.split(|&b| b == b'\n').enumerate() {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        match std::str::from_utf8(raw).ok().and_then(parse_line) {
            Some(record) => parsed.records.push(record),
            None => parsed.diagnostics.push(LineDiagnostic {
                line_number: idx + 1,
                line: String::from_utf8_lossy(raw).into_owned(),
            }),
        }
    }

    parsed
}

/// Parse the log file at `path`, reporting every malformed line to `sink`.
///
/// A missing log file is an error for the caller to report; it means no
/// unit of work has ever been recorded in this output area.
pub fn parse_log_file(path: impl AsRef<Path>, sink: &dyn LogSink) -> Result<Vec<EventRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::file_not_found(path.display().to_string()));
    }

    let content = fs::read(path).map_err(|e| {
        Error::event_log(format!("Failed to read '{}': {e}", path.display()))
    })?;

    let parsed = parse_log_bytes(&content);
    for diagnostic in &parsed.diagnostics {
        sink.error(&diagnostic.message());
    }

    tracing::debug!(
        records = parsed.records.len(),
        malformed = parsed.diagnostics.len(),
        "Parsed event log"
    );
    Ok(parsed.records)
}
