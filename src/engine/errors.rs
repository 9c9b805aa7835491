//! Engine error types

use thiserror::Error;

use crate::schema::DataType;

use super::record::RecordId;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures reported by a record engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("table '{0}' already exists")]
    TableExists(String),

    #[error("table '{0}' not found")]
    TableNotFound(String),

    #[error("table '{0}' is open and cannot be removed")]
    TableInUse(String),

    #[error("table '{0}' is not open")]
    TableNotOpen(String),

    #[error("attribute index {index} out of range (schema has {num_attr} attributes)")]
    AttributeOutOfRange { index: usize, num_attr: usize },

    #[error("attribute '{attribute}' expects {expected}, got {actual}")]
    TypeMismatch {
        attribute: String,
        expected: DataType,
        actual: DataType,
    },

    #[error("value for '{attribute}' is {len} bytes, capacity is {capacity}")]
    ValueTooLong {
        attribute: String,
        len: usize,
        capacity: usize,
    },

    #[error("record has {actual} slots but schema has {expected} attributes")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("attribute '{0}' has no value bound")]
    UnboundAttribute(String),

    #[error("record {0} not found")]
    RecordNotFound(RecordId),

    #[error("engine has been shut down")]
    ShutDown,
}

impl EngineError {
    /// Stable short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::TableExists(_) => "table_exists",
            EngineError::TableNotFound(_) => "table_not_found",
            EngineError::TableInUse(_) => "table_in_use",
            EngineError::TableNotOpen(_) => "table_not_open",
            EngineError::AttributeOutOfRange { .. } => "attribute_out_of_range",
            EngineError::TypeMismatch { .. } => "type_mismatch",
            EngineError::ValueTooLong { .. } => "value_too_long",
            EngineError::ShapeMismatch { .. } => "shape_mismatch",
            EngineError::UnboundAttribute(_) => "unbound_attribute",
            EngineError::RecordNotFound(_) => "record_not_found",
            EngineError::ShutDown => "shut_down",
        }
    }
}
