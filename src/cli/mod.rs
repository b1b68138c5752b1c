//! CLI module
//!
//! Command-line interface for paging through the configured listing.
//!
//! # Commands
//!
//! - `fetch` - Load pages one after another and print items as they arrive
//! - `config` - Print the effective service configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
