//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Incremental page loader for a REST listing
#[derive(Parser, Debug)]
#[command(name = "pagefeed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load pages sequentially and print their items
    Fetch {
        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,

        /// First page to load
        #[arg(long, default_value = "1")]
        start_page: u32,

        /// Items per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Site to list (overrides the configured `site` parameter)
        #[arg(long)]
        site: Option<String>,
    },

    /// Show the effective service configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
