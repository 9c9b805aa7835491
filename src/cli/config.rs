//! Console configuration
//!
//! An optional JSON file; every key has a default, so `{}` is a valid
//! configuration. Command-line flags win over the file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::console::{InputLimits, DEFAULT_TOKEN_LIMIT};
use crate::observability::Severity;
use crate::ops::MatchMode;

use super::args::Cli;
use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How deletions and modifications find rows (default "scan")
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Minimum log severity (default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Longest text value accepted at capture, in bytes (default 255)
    #[serde(default = "default_token_limit")]
    pub max_text_len: usize,

    /// Longest table or attribute name, in bytes (default 255)
    #[serde(default = "default_token_limit")]
    pub max_name_len: usize,
}

fn default_log_level() -> String {
    "warn".to_string()
}
fn default_token_limit() -> usize {
    DEFAULT_TOKEN_LIMIT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::default(),
            log_level: default_log_level(),
            max_text_len: default_token_limit(),
            max_name_len: default_token_limit(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Build the effective configuration: file (if any), then flags
    pub fn resolve(cli: &Cli) -> CliResult<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(mode) = cli.match_mode {
            config.match_mode = mode;
        }
        if let Some(level) = cli.log_level {
            config.log_level = level.as_str().to_ascii_lowercase();
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        self.severity()?;

        if self.max_text_len == 0 {
            return Err(CliError::config_error("max_text_len must be > 0"));
        }

        if self.max_name_len == 0 {
            return Err(CliError::config_error("max_name_len must be > 0"));
        }

        Ok(())
    }

    /// Parsed log level
    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Token limits for the console
    pub fn limits(&self) -> InputLimits {
        InputLimits {
            max_text_len: self.max_text_len,
            max_name_len: self.max_name_len,
        }
    }
}
