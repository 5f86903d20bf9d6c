//! CLI argument definitions using clap.

use std::path::PathBuf;

use assay_validator::rule::Category;
use clap::{Parser, Subcommand};

use crate::config::LogFormat;

/// Assay validation engine CLI.
#[derive(Parser, Debug)]
#[command(name = "assay")]
#[command(version)]
#[command(about = "Validate JSON values against Assay rules")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a configuration file (defaults to ./assay.toml when present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `assay_validator=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format.
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a validation request.
    ///
    /// Reads a request such as
    /// `{"validation_type": "email", "data": "ada@example.com"}` and prints
    /// the response. Exits 0 when the value is valid, 1 when it is not and
    /// 2 when the request itself is rejected.
    Validate {
        /// Request file; `-` or omitted reads standard input.
        #[arg(short, long)]
        request: Option<PathBuf>,

        /// Pretty-print the response.
        #[arg(short, long)]
        pretty: bool,
    },

    /// List the validation kinds.
    Kinds {
        /// Only kinds in this category.
        #[arg(long)]
        category: Option<Category>,

        /// Print descriptors as JSON.
        #[arg(long)]
        json: bool,
    },
}
