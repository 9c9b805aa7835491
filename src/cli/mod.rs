//! CLI module for rmconsole
//!
//! Provides the command-line surface:
//! - argument parsing and configuration resolution
//! - the interactive menu session
//! - process-level errors with stable codes

mod args;
mod commands;
mod config;
mod errors;

pub use args::Cli;
pub use commands::{run, MenuChoice, Session};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
