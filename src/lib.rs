//! rmconsole - an interactive console for a schema-based record engine
//!
//! The console prompts for table definitions and row values, converts the
//! answers into typed values and drives a [`engine::RecordEngine`] through
//! create, remove, insert, delete and modify requests.

pub mod cli;
pub mod console;
pub mod engine;
pub mod observability;
pub mod ops;
pub mod schema;
pub mod value;
