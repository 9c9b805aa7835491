//! Interactive console I/O
//!
//! The console is the only place the program blocks: every prompt is a
//! synchronous read from a `BufRead`, every message a write to a `Write`.
//! Both ends are generic so sessions can run against stdin/stdout, a script
//! file, or in-memory buffers.

mod errors;
mod prompt;

pub use errors::{ConsoleError, ConsoleResult};
pub use prompt::{Console, InputLimits, DEFAULT_TOKEN_LIMIT};
