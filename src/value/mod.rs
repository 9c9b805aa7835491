//! Typed attribute values
//!
//! A [`Value`] is one scalar or text payload tagged with its type. Text owns
//! its buffer; the capacity declared in the schema is enforced by the engine
//! when the value is bound, not by the value itself.

mod capture;

pub use capture::{capture_value, parse_bool};

use std::fmt;

use crate::schema::DataType;

/// A single typed payload
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    pub fn int(v: i64) -> Self {
        Value::Int(v)
    }

    pub fn float(v: f64) -> Self {
        Value::Float(v)
    }

    pub fn text(v: impl Into<String>) -> Self {
        Value::Text(v.into())
    }

    pub fn bool(v: bool) -> Self {
        Value::Bool(v)
    }

    /// The type tag of the active variant
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
            Value::Text(_) => DataType::Text,
            Value::Bool(_) => DataType::Bool,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
        }
    }
}
