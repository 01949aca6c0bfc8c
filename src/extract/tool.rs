//! External extraction executable

use super::folder::{create_run_folder, RunFolder};
use crate::error::{Error, Result};
use crate::eventlog::{EventLog, LogSink};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Action tag recorded for a successful extraction
pub const EXTRACT_ACTION: &str = "extract";

/// Name of the captured tool output inside a run folder
pub const TOOL_LOG_NAME: &str = "extraction.log";

/// The extraction executable and its trailing arguments
#[derive(Debug, Clone)]
pub struct ExtractionTool {
    path: PathBuf,
    extra_args: Vec<String>,
}

/// Outcome of a batch extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionSummary {
    /// Inputs extracted and recorded
    pub succeeded: usize,
    /// Inputs abandoned
    pub failed: usize,
}

impl ExtractionTool {
    /// Create a tool invocation
    pub fn new(path: impl Into<PathBuf>, extra_args: Vec<String>) -> Self {
        Self {
            path: path.into(),
            extra_args,
        }
    }

    /// Executable path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Argument list for one input
    pub fn args(&self, input: &Path, folder: &Path) -> Vec<String> {
        let mut args = vec![
            "extract".to_string(),
            input.display().to_string(),
            "-extractFolder".to_string(),
            folder.display().to_string(),
        ];
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Run the tool for one input; the captured output is written to
    /// `extraction.log` inside `folder`
    pub async fn extract(&self, input: &Path, folder: &Path) -> Result<()> {
        if !self.path.exists() {
            return Err(Error::ToolNotFound {
                path: self.path.display().to_string(),
            });
        }

        let args = self.args(input, folder);
        tracing::debug!(tool = %self.path.display(), ?args, "Executing extraction tool");

        let output = Command::new(&self.path).args(&args).output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(Error::ToolFailed {
                input: input.display().to_string(),
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        let mut captured = stdout.into_owned();
        if !stderr.is_empty() {
            captured.push('\n');
            captured.push_str(&stderr);
        }
        tokio::fs::write(folder.join(TOOL_LOG_NAME), captured).await?;
        Ok(())
    }
}

/// Extract every input in order, recording one event per success.
///
/// A failing input is reported and abandoned; the remaining inputs are
/// still processed.
pub async fn extract_all(
    tool: &ExtractionTool,
    inputs: &[PathBuf],
    output_dir: &Path,
    log: &EventLog,
) -> ExtractionSummary {
    let mut summary = ExtractionSummary::default();

    for input in inputs {
        match extract_one(tool, input, output_dir, log).await {
            Ok(folder) => {
                summary.succeeded += 1;
                log.progress(&format!(
                    "Extracted {} to {}",
                    input.display(),
                    folder.path.display()
                ));
            }
            Err(e) => {
                summary.failed += 1;
                log.error(&format!("Error processing {}: {e}", input.display()));
            }
        }
    }

    summary
}

async fn extract_one(
    tool: &ExtractionTool,
    input: &Path,
    output_dir: &Path,
    log: &EventLog,
) -> Result<RunFolder> {
    let folder = create_run_folder(output_dir, input)?;
    log.progress(&format!(
        "Going to extract {} to {}",
        input.display(),
        folder.path.display()
    ));

    tool.extract(input, &folder.path).await?;
    log.record_action(
        EXTRACT_ACTION,
        &input.display().to_string(),
        &folder.path.display().to_string(),
    )?;
    Ok(folder)
}
