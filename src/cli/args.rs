//! CLI argument definitions using clap
//!
//! rmconsole [--config <path>] [--input <path>] [--match-mode scan|identity] [--log-level <level>]
//!
//! Flags override the configuration file.

use clap::Parser;
use std::path::PathBuf;

use crate::observability::Severity;
use crate::ops::MatchMode;

/// rmconsole - interactive console for a schema-based record engine
#[derive(Parser, Debug)]
#[command(name = "rmconsole")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Read answers from this file instead of stdin
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// How deletions and modifications find their target rows
    #[arg(long, value_enum)]
    pub match_mode: Option<MatchMode>,

    /// Minimum severity of log lines written to stderr (trace, info, warn, error)
    #[arg(long)]
    pub log_level: Option<Severity>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
