//! Table schemas
//!
//! A schema is the ordered list of attribute descriptors that shapes every
//! record of a table. Schemas are built once, from an interactively
//! configured [`AttributeConfig`], and handed to the engine at table
//! creation; afterwards the engine hands them back when a table is opened.
//!
//! # Invariants
//!
//! - At least one attribute
//! - Every name non-empty and unique
//! - Text attributes carry a positive capacity, no other type carries one

mod configurator;
mod errors;
mod types;

pub use configurator::{configure_attributes, resolve_type_code, AttributeConfig, DEFAULT_TYPE};
pub use errors::{SchemaError, SchemaResult};
pub use types::{AttributeDef, DataType, Schema};
