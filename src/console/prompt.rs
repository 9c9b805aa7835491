//! Token-oriented prompt I/O
//!
//! Input is split on whitespace the way a line-based terminal user types it:
//! several answers may sit on one line, and one answer may be preceded by
//! blank lines. Prompts are flushed before each read so they show up on an
//! interactive terminal.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use super::errors::{ConsoleError, ConsoleResult};

/// Default bound for names and captured text tokens
pub const DEFAULT_TOKEN_LIMIT: usize = 255;

/// Size limits applied to free-form tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    /// Longest accepted text value, in bytes
    pub max_text_len: usize,
    /// Longest accepted table or attribute name, in bytes
    pub max_name_len: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_text_len: DEFAULT_TOKEN_LIMIT,
            max_name_len: DEFAULT_TOKEN_LIMIT,
        }
    }
}

/// Interactive console over a reader/writer pair
pub struct Console<R, W> {
    reader: R,
    writer: W,
    limits: InputLimits,
    pending: VecDeque<String>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(reader: R, writer: W, limits: InputLimits) -> Self {
        Self {
            reader,
            writer,
            limits,
            pending: VecDeque::new(),
        }
    }

    pub fn limits(&self) -> InputLimits {
        self.limits
    }

    /// Give back the underlying reader and writer
    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Write a prompt without a newline and flush it
    pub fn prompt(&mut self, text: &str) -> ConsoleResult<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write one full line
    pub fn say(&mut self, line: &str) -> ConsoleResult<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Next whitespace-delimited token, reading more lines as needed
    pub fn next_token(&mut self) -> ConsoleResult<String> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(token);
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(ConsoleError::EndOfInput);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }

    /// Drop tokens already read but not yet consumed
    ///
    /// Returns how many were dropped.
    pub fn discard_pending(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Prompt, then read one token
    pub fn ask(&mut self, prompt: &str) -> ConsoleResult<String> {
        self.prompt(prompt)?;
        self.next_token()
    }

    /// Prompt for a signed integer
    pub fn ask_i64(&mut self, prompt: &str) -> ConsoleResult<i64> {
        let token = self.ask(prompt)?;
        token
            .parse()
            .map_err(|_| ConsoleError::InvalidNumber {
                expected: "an integer",
                input: token,
            })
    }

    /// Prompt for a floating point number
    pub fn ask_f64(&mut self, prompt: &str) -> ConsoleResult<f64> {
        let token = self.ask(prompt)?;
        token
            .parse()
            .map_err(|_| ConsoleError::InvalidNumber {
                expected: "a decimal number",
                input: token,
            })
    }

    /// Prompt for a table or attribute name, bounded by `max_name_len`
    pub fn ask_name(&mut self, prompt: &str) -> ConsoleResult<String> {
        let token = self.ask(prompt)?;
        bounded("name", token, self.limits.max_name_len)
    }

    /// Prompt for a text value, bounded by `max_text_len`
    pub fn ask_text(&mut self, prompt: &str) -> ConsoleResult<String> {
        let token = self.ask(prompt)?;
        bounded("text value", token, self.limits.max_text_len)
    }
}

fn bounded(what: &'static str, token: String, limit: usize) -> ConsoleResult<String> {
    if token.len() > limit {
        return Err(ConsoleError::TooLong {
            what,
            len: token.len(),
            limit,
        });
    }
    Ok(token)
}
