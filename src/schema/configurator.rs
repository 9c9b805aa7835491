//! Interactive attribute configuration
//!
//! Builds the ordered attribute list for a new table. The result is an
//! [`AttributeConfig`], which is consumed by [`AttributeConfig::into_schema`];
//! nothing keeps it around after the schema exists.
//!
//! # Default type policy
//!
//! A type code other than `I`, `F`, `S` or `B` is not an error. It maps to
//! [`DEFAULT_TYPE`] (integer) with no capacity, and the coercion is logged as
//! `TYPE_CODE_DEFAULTED`.

use std::io::{BufRead, Write};
use std::num::NonZeroUsize;

use crate::console::{Console, ConsoleError, ConsoleResult};
use crate::observability::{log_event_with_fields, Event};

use super::errors::SchemaResult;
use super::types::{AttributeDef, DataType, Schema};

/// Type given to attributes declared with an unrecognized type code
pub const DEFAULT_TYPE: DataType = DataType::Int;

/// Attribute descriptors collected before the schema is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeConfig {
    attributes: Vec<AttributeDef>,
}

impl AttributeConfig {
    pub fn new(attributes: Vec<AttributeDef>) -> Self {
        Self { attributes }
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    /// Build the schema, with no key attributes
    pub fn into_schema(self) -> SchemaResult<Schema> {
        Schema::new(self.attributes, Vec::new())
    }
}

/// Resolve a type code under the default type policy
///
/// Returns the type and whether the default was applied.
pub fn resolve_type_code(code: &str) -> (DataType, bool) {
    match DataType::from_code(code) {
        Some(data_type) => (data_type, false),
        None => (DEFAULT_TYPE, true),
    }
}

/// Prompt for an attribute count and that many attribute descriptors
///
/// A count below one yields an empty config, which schema construction
/// rejects.
pub fn configure_attributes<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
) -> ConsoleResult<AttributeConfig> {
    let count = console.ask_i64("Attribute count: ")?;
    let count = usize::try_from(count).unwrap_or(0);

    let mut attributes = Vec::with_capacity(count.min(64));
    for position in 1..=count {
        let name = console.ask_name(&format!("Attribute #{} identifier: ", position))?;
        let code = console.ask(&type_prompt())?;

        let (data_type, defaulted) = resolve_type_code(&code);
        if defaulted {
            log_event_with_fields(
                Event::TypeCodeDefaulted,
                &[
                    ("attribute", name.as_str()),
                    ("code", code.as_str()),
                    ("default", DEFAULT_TYPE.type_name()),
                ],
            );
        }

        let attr = match data_type {
            DataType::Text => {
                let capacity = ask_capacity(console)?;
                AttributeDef::text(name, capacity)
            }
            other => AttributeDef::scalar(name, other),
        };
        attributes.push(attr);
    }

    Ok(AttributeConfig::new(attributes))
}

/// `Type (I=int, F=float, S=string, B=bool): `
fn type_prompt() -> String {
    let choices: Vec<String> = DataType::ALL
        .iter()
        .map(|dt| format!("{}={}", dt.code(), dt.type_name()))
        .collect();
    format!("Type ({}): ", choices.join(", "))
}

fn ask_capacity<R: BufRead, W: Write>(console: &mut Console<R, W>) -> ConsoleResult<NonZeroUsize> {
    let raw = console.ask_i64("String capacity: ")?;
    usize::try_from(raw)
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or_else(|| ConsoleError::InvalidNumber {
            expected: "a positive capacity",
            input: raw.to_string(),
        })
}
