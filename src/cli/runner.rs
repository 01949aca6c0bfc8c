//! CLI runner - executes commands
//!
//! Every step opens the output area's [`EventLog`] once and hands it to the
//! components it drives. A step whose input artifact is missing reports it
//! and is skipped; it never aborts the batch.

use crate::classify::{enrich_partitions, EnrichedPartitionRecord};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PipelineConfig;
use crate::error::{Result, ResultExt};
use crate::eventlog::{parse_log_file, EventLog, LogSink};
use crate::export::{export_provenance, write_json_document, ProvenanceTable};
use crate::extract::{clear_output_area, discover_inputs, extract_all, ExtractionTool};
use crate::output::{write_enriched_csv, write_enriched_parquet};
use crate::partition::{extract_partitions, index_table_files, PartitionRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            // The log lives inside the output area, so reset must not open it
            Commands::Reset => self.reset(&config),
            command => {
                let log = self.open_log(&config)?;
                self.dispatch(command, config, &log).await
            }
        }
    }

    async fn dispatch(
        &self,
        command: &Commands,
        config: PipelineConfig,
        log: &EventLog,
    ) -> Result<()> {
        match command {
            Commands::Extract { input, tool } => {
                let config = with_extract_overrides(config, input.as_ref(), tool.as_ref());
                self.extract(&config, log).await
            }
            Commands::Export => self.export(&config, log).map(|_| ()),
            Commands::Partitions => self.partitions(&config, log).map(|_| ()),
            Commands::Classify { provenance, format } => {
                let provenance_path = provenance
                    .clone()
                    .unwrap_or_else(|| config.provenance_json_path());
                let provenance = self.load_provenance(&provenance_path, log);
                let Some(partitions) = self.load_partitions(&config, log)? else {
                    return Ok(());
                };
                self.classify(&config, log, &partitions, &provenance, *format)
                    .map(|_| ())
            }
            Commands::Tables => self.tables(&config, log),
            Commands::Run {
                extract,
                input,
                tool,
                format,
            } => {
                let config = with_extract_overrides(config, input.as_ref(), tool.as_ref());
                if *extract {
                    self.extract(&config, log).await?;
                }
                let provenance = self.export(&config, log)?;
                let partitions = self.partitions(&config, log)?;
                self.classify(&config, log, &partitions, &provenance, *format)
                    .map(|_| ())
            }
            Commands::Reset => Ok(()),
        }
    }

    /// Load configuration, applying global CLI overrides
    fn load_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.cli.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(dir) = &self.cli.output_dir {
            config = config.with_output_dir(dir);
        }
        Ok(config)
    }

    fn open_log(&self, config: &PipelineConfig) -> Result<EventLog> {
        EventLog::open(
            &config.output_dir,
            &config.artifacts.summary_log,
            &config.artifacts.progress_log,
            &config.artifacts.error_log,
        )
    }

    // ========================================================================
    // Steps
    // ========================================================================

    /// Extract every discovered input
    async fn extract(&self, config: &PipelineConfig, log: &EventLog) -> Result<()> {
        log.progress(&format!(
            "Scanning for .{} files in {}",
            config.file_extension,
            config.input_dir.display()
        ));

        let inputs = match discover_inputs(&config.input_dir, &config.file_extension) {
            Ok(inputs) => inputs,
            Err(e) => {
                log.error(&format!("Input discovery failed: {e}"));
                return Ok(());
            }
        };

        let tool = ExtractionTool::new(&config.tool_path, config.tool_args.clone());
        let summary = extract_all(&tool, &inputs, &config.output_dir, log).await;
        log.progress(&format!(
            "Extraction finished: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        ));
        Ok(())
    }

    /// Parse the event log and write both provenance artifacts
    fn export(&self, config: &PipelineConfig, log: &EventLog) -> Result<ProvenanceTable> {
        // Opening the log created the record stream, so it is always present
        let records = parse_log_file(log.records_path(), log)?;

        let csv_path = config.provenance_csv_path();
        let json_path = config.provenance_json_path();
        let table = export_provenance(records, &csv_path, &json_path)?;
        log.progress(&format!(
            "Converted {} to CSV at {} and JSON at {}",
            log.records_path().display(),
            csv_path.display(),
            json_path.display()
        ));
        Ok(table)
    }

    /// Flatten model documents into the partition summary
    fn partitions(&self, config: &PipelineConfig, log: &EventLog) -> Result<Vec<PartitionRecord>> {
        let partitions = extract_partitions(&config.output_dir, &config.model_document, log)?;

        let path = config.partition_summary_path();
        write_json_document(&partitions, &path)?;
        log.progress(&format!(
            "Partition summary with {} partitions saved to {}",
            partitions.len(),
            path.display()
        ));
        Ok(partitions)
    }

    /// Enrich partitions and write the classified artifacts
    fn classify(
        &self,
        config: &PipelineConfig,
        log: &EventLog,
        partitions: &[PartitionRecord],
        provenance: &ProvenanceTable,
        format: OutputFormat,
    ) -> Result<Vec<EnrichedPartitionRecord>> {
        let enriched = enrich_partitions(partitions, provenance);

        let json_path = config.classified_json_path();
        write_json_document(&enriched, &json_path)?;
        log.progress(&format!(
            "Classified {} of {} partitions into {}",
            enriched.len(),
            partitions.len(),
            json_path.display()
        ));

        let rendered: Option<PathBuf> = match format {
            OutputFormat::Json => None,
            OutputFormat::Csv => {
                let path = config.classified_csv_path();
                write_enriched_csv(&enriched, &path)?;
                Some(path)
            }
            OutputFormat::Parquet => {
                let path = config.classified_parquet_path();
                write_enriched_parquet(&enriched, &path)?;
                Some(path)
            }
        };
        if let Some(path) = rendered {
            log.progress(&format!("Rendered classified partitions to {}", path.display()));
        }

        Ok(enriched)
    }

    /// Write the per-table model file index
    fn tables(&self, config: &PipelineConfig, log: &EventLog) -> Result<()> {
        let entries = index_table_files(&config.output_dir, &config.tables_dir)?;
        let path = config.tmdl_index_path();
        write_json_document(&entries, &path)?;
        log.progress(&format!("Saved .tmdl list to JSON at {}", path.display()));
        Ok(())
    }

    /// Clear the output area
    fn reset(&self, config: &PipelineConfig) -> Result<()> {
        let removed = clear_output_area(&config.output_dir)?;
        tracing::info!(
            removed,
            output = %config.output_dir.display(),
            "Cleared output area"
        );
        Ok(())
    }

    // ========================================================================
    // Artifact loading
    // ========================================================================

    /// Load the provenance table; a missing or unreadable table degrades to
    /// an empty one so every partition resolves to the sentinel
    fn load_provenance(&self, path: &Path, log: &EventLog) -> ProvenanceTable {
        match ProvenanceTable::from_path(path) {
            Ok(table) => table,
            Err(e) => {
                log.error(&format!("Provenance table unavailable ({e}), sources will be UNKNOWN"));
                ProvenanceTable::default()
            }
        }
    }

    /// Load the partition summary written by the `partitions` step
    fn load_partitions(
        &self,
        config: &PipelineConfig,
        log: &EventLog,
    ) -> Result<Option<Vec<PartitionRecord>>> {
        let path = config.partition_summary_path();
        if !path.exists() {
            log.error(&format!("{} not found.", path.display()));
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read partition summary '{}'", path.display()))?;
        let partitions: Vec<PartitionRecord> = serde_json::from_str(&content)
            .with_context(|| format!("Invalid partition summary '{}'", path.display()))?;
        Ok(Some(partitions))
    }
}

fn with_extract_overrides(
    mut config: PipelineConfig,
    input: Option<&PathBuf>,
    tool: Option<&PathBuf>,
) -> PipelineConfig {
    if let Some(input) = input {
        config = config.with_input_dir(input);
    }
    if let Some(tool) = tool {
        config = config.with_tool_path(tool);
    }
    config
}
