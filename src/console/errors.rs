//! Console input errors

use std::io;

use thiserror::Error;

/// Result type for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

/// Failures while reading or writing the interactive console
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("end of input")]
    EndOfInput,

    #[error("expected {expected}, got '{input}'")]
    InvalidNumber {
        expected: &'static str,
        input: String,
    },

    #[error("expected a boolean (1/0, t/f, true/false, y/n, yes/no), got '{0}'")]
    InvalidBool(String),

    #[error("{what} is {len} bytes long, limit is {limit}")]
    TooLong {
        what: &'static str,
        len: usize,
        limit: usize,
    },
}

impl ConsoleError {
    /// Input ran out; the session should end rather than report a failure
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, ConsoleError::EndOfInput)
    }
}
