//! Error types for pbix-lineage
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Per-record problems (a corrupt log line, an unreadable model document, a
//! missing provenance row) are never surfaced through this type: they are
//! reported to the log sink and the batch moves on.

use thiserror::Error;

/// The main error type for pbix-lineage
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Event Log Errors
    // ============================================================================
    #[error("Event log error: {message}")]
    EventLog { message: String },

    // ============================================================================
    // Extraction Tool Errors
    // ============================================================================
    #[error("Extraction tool not found at {path}")]
    ToolNotFound { path: String },

    #[error("Extraction failed for '{input}' (exit code {code:?}): {stderr}")]
    ToolFailed {
        input: String,
        code: Option<i32>,
        stderr: String,
    },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Model document error in '{path}': {message}")]
    ModelDocument { path: String, message: String },

    #[error("CSV parsing error: {message}")]
    CsvParse { message: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an event log error
    pub fn event_log(message: impl Into<String>) -> Self {
        Self::EventLog {
            message: message.into(),
        }
    }

    /// Create a model document error
    pub fn model_document(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelDocument {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a CSV parse error
    pub fn csv(message: impl Into<String>) -> Self {
        Self::CsvParse {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Create a file-not-found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

/// Result type alias for pbix-lineage
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::invalid_value("output_dir", "must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'output_dir': must not be empty"
        );

        let err = Error::ToolFailed {
            input: "a.pbix".to_string(),
            code: Some(2),
            stderr: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Extraction failed for 'a.pbix' (exit code Some(2)): boom"
        );
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
