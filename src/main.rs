//! rmconsole entry point
//!
//! This is a minimal entrypoint that:
//! 1. Parses CLI arguments and configuration (via cli::run)
//! 2. Runs the menu session (via cli::run)
//! 3. Prints errors to stderr
//! 4. Exits with non-zero on failure
//!
//! End of input is a normal exit.

use rmconsole::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
