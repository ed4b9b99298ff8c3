//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Alembic: AI-directed preprocessing for tabular datasets
#[derive(Parser)]
#[command(name = "alembic")]
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
    /// Summarize a data file (the snapshot a plan provider decides from)
    Analyze {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the summary JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask a plan provider for a preprocessing plan
    Plan {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the plan JSON (default: <file>.plan.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the offline rule-based provider instead of OpenRouter
        #[arg(long)]
        mock: bool,

        /// Model to request from OpenRouter
        #[arg(long)]
        model: Option<String>,
    },

    /// Execute a plan and export the processed dataset
    Apply {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Path to a plan JSON; omit to request one from a provider
        #[arg(short, long)]
        plan: Option<PathBuf>,

        /// Use the offline rule-based provider when no plan file is given
        #[arg(long)]
        mock: bool,

        /// Replace the first action for a column, e.g. --override Age=drop
        #[arg(long = "override", value_name = "COLUMN=ACTION")]
        overrides: Vec<String>,

        /// Output path for the processed data (default: <file>.processed.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output path for the action log (default: <file>.actions.json)
        #[arg(short, long)]
        log: Option<PathBuf>,
    },
}
