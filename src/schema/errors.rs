//! Schema construction errors

use thiserror::Error;

use super::types::DataType;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Structural problems found while building a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema must declare at least one attribute")]
    Empty,

    #[error("attribute #{} has an empty name", .index + 1)]
    EmptyName { index: usize },

    #[error("attribute '{0}' declared more than once")]
    DuplicateName(String),

    #[error("string attribute '{0}' needs a positive capacity")]
    MissingCapacity(String),

    #[error("attribute '{name}' of type {data_type} cannot carry a capacity")]
    UnexpectedCapacity { name: String, data_type: DataType },

    #[error("key attribute {index} out of range (schema has {num_attr} attributes)")]
    KeyOutOfRange { index: usize, num_attr: usize },
}
