//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Report data-model lineage CLI
#[derive(Parser, Debug)]
#[command(name = "pbix-lineage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output area (overrides config)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract every report file under the input directory
    Extract {
        /// Directory to scan (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Extraction executable (overrides config)
        #[arg(long)]
        tool: Option<PathBuf>,
    },

    /// Convert the event log into the provenance CSV and JSON
    Export,

    /// Write the flat partition summary of all runs
    Partitions,

    /// Classify partitions and enrich them with provenance
    Classify {
        /// Provenance table to join against (.csv or .json)
        #[arg(long)]
        provenance: Option<PathBuf>,

        /// Additional tabular rendering
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Index per-table model files of all runs
    Tables,

    /// Export, extract partitions and classify in one pass
    Run {
        /// Run the extraction tool first
        #[arg(long)]
        extract: bool,

        /// Directory to scan when extracting (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Extraction executable (overrides config)
        #[arg(long)]
        tool: Option<PathBuf>,

        /// Additional tabular rendering
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,
    },

    /// Remove everything inside the output area, including the event log
    Reset,
}

/// Rendering of the classified partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON document only
    Json,
    /// JSON document plus CSV table
    Csv,
    /// JSON document plus Parquet file
    Parquet,
}
