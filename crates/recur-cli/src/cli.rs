//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Recurrence inference for calendar occurrences.
///
/// Reads a flat list of concrete occurrences and compresses it into
/// recurring events with exceptions and additions.
#[derive(Debug, Parser)]
#[command(name = "recur", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Infer recurring events from a JSON array of occurrences.
    Infer {
        /// Input file, or `-` for stdin.
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Output the events as JSON instead of a summary.
        #[arg(long)]
        json: bool,

        /// Bound patterns by their last instant instead of a repetition count.
        #[arg(long)]
        until: bool,
    },

    /// Verify that the inferred events re-expand to exactly the input.
    Check {
        /// Input file, or `-` for stdin.
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
}
