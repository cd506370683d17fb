//! Command-line argument definitions for the phyloplot CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. The command selects a pipeline; paths and every other
//! setting come from the configuration file.

use clap::{Parser, Subcommand};

/// Command-line arguments for the phyloplot tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Chart to render
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

/// The pipeline to run.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Render the phylogenetic-diversity line chart
    Diversity,
    /// Embed the distance matrix and render the scatter plot
    TreeSpace,
}
