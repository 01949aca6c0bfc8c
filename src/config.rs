//! Pipeline configuration
//!
//! Every setting has a default, so an empty (or absent) YAML file yields a
//! working configuration that mirrors the conventional `./input` → `output/`
//! layout. CLI flags are applied on top with the `with_*` builders.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-Level Pipeline Config
// ============================================================================

/// Complete pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root directory scanned for report files
    pub input_dir: PathBuf,

    /// Output area holding run folders and all summary artifacts
    pub output_dir: PathBuf,

    /// Path to the external extraction executable
    pub tool_path: PathBuf,

    /// Extra arguments appended after `-extractFolder <folder>`
    pub tool_args: Vec<String>,

    /// Extension (without dot) of report files to extract, case-insensitive
    pub file_extension: String,

    /// Location of the model-definition document inside a run folder
    pub model_document: PathBuf,

    /// Location of the per-table model files inside a run folder
    pub tables_dir: PathBuf,

    /// Artifact file names, relative to `output_dir`
    pub artifacts: ArtifactNames,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input"),
            output_dir: PathBuf::from("output"),
            tool_path: PathBuf::from("pbi-tools").join("pbi-tools.exe"),
            tool_args: vec!["-modelSerialization".to_string(), "Raw".to_string()],
            file_extension: "pbix".to_string(),
            model_document: PathBuf::from("Model").join("database.json"),
            tables_dir: PathBuf::from("Model").join("tables"),
            artifacts: ArtifactNames::default(),
        }
    }
}

// ============================================================================
// Artifact Names
// ============================================================================

/// File names of the artifacts written into the output area
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactNames {
    /// Append-only event record log
    pub summary_log: String,
    /// Progress log
    pub progress_log: String,
    /// Error log
    pub error_log: String,
    /// Row-oriented provenance table
    pub provenance_csv: String,
    /// Document-oriented provenance table
    pub provenance_json: String,
    /// Flat partition summary document
    pub partition_summary: String,
    /// Enriched/classified partition document
    pub classified_json: String,
    /// Tabular rendering of the classified partitions (CSV)
    pub classified_csv: String,
    /// Tabular rendering of the classified partitions (Parquet)
    pub classified_parquet: String,
    /// Index of per-table model files
    pub tmdl_index: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            summary_log: "summary_log.txt".to_string(),
            progress_log: "extraction_log.txt".to_string(),
            error_log: "error_log.txt".to_string(),
            provenance_csv: "summary_log.csv".to_string(),
            provenance_json: "summary_log.json".to_string(),
            partition_summary: "partition_summary.json".to_string(),
            classified_json: "partition_classified.json".to_string(),
            classified_csv: "partition_classified.csv".to_string(),
            classified_parquet: "partition_classified.parquet".to_string(),
            tmdl_index: "tmdl_index.json".to_string(),
        }
    }
}

impl ArtifactNames {
    fn all(&self) -> [(&'static str, &str); 10] {
        [
            ("summary_log", &self.summary_log),
            ("progress_log", &self.progress_log),
            ("error_log", &self.error_log),
            ("provenance_csv", &self.provenance_csv),
            ("provenance_json", &self.provenance_json),
            ("partition_summary", &self.partition_summary),
            ("classified_json", &self.classified_json),
            ("classified_csv", &self.classified_csv),
            ("classified_parquet", &self.classified_parquet),
            ("tmdl_index", &self.tmdl_index),
        ]
    }
}

// ============================================================================
// Loading
// ============================================================================

impl PipelineConfig {
    /// Load a configuration file, validating the result
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config(format!("Config file '{}' not found", path.display()))
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as all defaults
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::invalid_value("output_dir", "must not be empty"));
        }

        if self.file_extension.is_empty() || self.file_extension.starts_with('.') {
            return Err(Error::invalid_value(
                "file_extension",
                "must be a bare extension such as 'pbix'",
            ));
        }

        if self.model_document.is_absolute() {
            return Err(Error::invalid_value(
                "model_document",
                "must be relative to the run folder",
            ));
        }

        for (field, name) in self.artifacts.all() {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(Error::invalid_value(
                    format!("artifacts.{field}"),
                    "must be a plain file name",
                ));
            }
        }

        Ok(())
    }

    // ========================================================================
    // CLI overrides
    // ========================================================================

    /// Override the input directory
    #[must_use]
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Override the output directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Override the extraction tool path
    #[must_use]
    pub fn with_tool_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tool_path = path.into();
        self
    }

    // ========================================================================
    // Resolved paths
    // ========================================================================

    /// Path of an artifact inside the output area
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Event record log path
    pub fn summary_log_path(&self) -> PathBuf {
        self.artifact_path(&self.artifacts.summary_log)
    }

    /// Provenance CSV path
    pub fn provenance_csv_path(&self) -> PathBuf {
        self.artifact_path(&self.artifacts.provenance_csv)
    }

    /// Provenance JSON path
    pub fn provenance_json_path(&self) -> PathBuf {
        self.artifact_path(&self.artifacts.provenance_json)
    }

    /// Partition summary path
    pub fn partition_summary_path(&self) -> PathBuf {
        self.artifact_path(&self.artifacts.partition_summary)
    }

    /// Classified JSON path
    pub fn classified_json_path(&self) -> PathBuf {
        self.artifact_path(&self.artifacts.classified_json)
    }

    /// Classified CSV path
    pub fn classified_csv_path(&self) -> PathBuf {
        self.artifact_path(&self.artifacts.classified_csv)
    }

    /// Classified Parquet path
    pub fn classified_parquet_path(&self) -> PathBuf {
        self.artifact_path(&self.artifacts.classified_parquet)
    }

    /// Table-file index path
    pub fn tmdl_index_path(&self) -> PathBuf {
        self.artifact_path(&self.artifacts.tmdl_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.file_extension, "pbix");
        assert_eq!(config.summary_log_path(), PathBuf::from("output/summary_log.txt"));
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = PipelineConfig::from_yaml("").unwrap();
        assert_eq!(config.artifacts, ArtifactNames::default());
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r"
output_dir: /tmp/lineage
tool_args: []
artifacts:
  classified_json: lineage.json
";
        let config = PipelineConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/lineage"));
        assert!(config.tool_args.is_empty());
        assert_eq!(
            config.classified_json_path(),
            PathBuf::from("/tmp/lineage/lineage.json")
        );
        // untouched fields keep their defaults
        assert_eq!(config.artifacts.summary_log, "summary_log.txt");
        assert_eq!(config.input_dir, PathBuf::from("./input"));
    }

    #[test]
    fn test_invalid_extension() {
        let err = PipelineConfig::from_yaml("file_extension: .pbix").unwrap_err();
        assert!(err.to_string().contains("file_extension"));
    }

    #[test]
    fn test_artifact_name_with_separator_rejected() {
        let err = PipelineConfig::from_yaml("artifacts:\n  error_log: logs/err.txt").unwrap_err();
        assert!(err.to_string().contains("artifacts.error_log"));
    }

    #[test]
    fn test_malformed_yaml() {
        let err = PipelineConfig::from_yaml("output_dir: [unclosed").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
        assert!(err.to_string().starts_with("Failed to parse YAML"));
    }

    #[test]
    fn test_cli_overrides() {
        let config = PipelineConfig::default()
            .with_input_dir("reports")
            .with_output_dir("out")
            .with_tool_path("/opt/pbi-tools");
        assert_eq!(config.input_dir, PathBuf::from("reports"));
        assert_eq!(config.provenance_csv_path(), PathBuf::from("out/summary_log.csv"));
        assert_eq!(config.tool_path, PathBuf::from("/opt/pbi-tools"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = PipelineConfig::from_file("/nonexistent/lineage.yaml").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
