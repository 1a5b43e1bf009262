//! CLI argument definitions using clap
//!
//! Commands:
//! - pageflow query --data <path> [--config <path>]
//! - pageflow session --data <path> [--config <path>] [--highlight]
//! - pageflow generate --count <n> --out <path> [--seed <n>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// pageflow - incremental filter, search, sort and paging over JSON datasets
#[derive(Parser, Debug)]
#[command(name = "pageflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply one query descriptor read from stdin and print the page
    Query {
        /// JSON array of records
        #[arg(long)]
        data: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run an interactive session driven by JSON events on stdin
    Session {
        /// JSON array of records
        #[arg(long)]
        data: PathBuf,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Wrap search matches in <mark> tags
        #[arg(long)]
        highlight: bool,
    },

    /// Write a synthetic user dataset
    Generate {
        /// Number of users
        #[arg(long, default_value_t = 100)]
        count: usize,

        /// Output file
        #[arg(long)]
        out: PathBuf,

        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
