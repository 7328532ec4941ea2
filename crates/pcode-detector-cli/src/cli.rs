//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use pcode_detector::SecondaryCheck;
use std::path::PathBuf;

/// pcode-detector: find P-coded and coordinate-coded humanitarian datasets
#[derive(Parser)]
#[command(name = "pcode-detector")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify every resource in a dataset manifest
    Run {
        /// JSON manifest: an array of datasets with their resources
        #[arg(short, long, value_name = "DATASETS_JSON")]
        manifest: PathBuf,

        /// Project configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Reference code table (CSV); overrides reference.path
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Report output path
        #[arg(short, long, default_value = "datasets_location_status.csv")]
        output: PathBuf,

        /// Secondary check to run when a resource is not P-coded
        #[arg(long)]
        secondary: Option<SecondaryCheck>,

        /// Maximum data rows read per fragment
        #[arg(long)]
        sample_rows: Option<usize>,

        /// Size ceiling in bytes
        #[arg(long)]
        max_size: Option<u64>,
    },

    /// Show how a single local file is normalized and matched
    Inspect {
        /// Path to the data file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// File type to read the file as (default: from the extension)
        #[arg(short, long)]
        format: Option<String>,

        /// Comma-separated ISO3 locations whose codes are candidates
        #[arg(short, long, value_delimiter = ',')]
        locations: Vec<String>,

        /// Reference code table (CSV)
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Project configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the code and mis-coding indices and dump them as JSON
    Codes {
        /// Reference code table (CSV)
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Project configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Comma-separated ISO3 locations to keep
        #[arg(short, long, value_delimiter = ',')]
        locations: Vec<String>,
    },
}
