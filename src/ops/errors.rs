//! Request-level errors for the CRUD orchestrators

use thiserror::Error;

use crate::console::ConsoleError;
use crate::engine::EngineError;
use crate::schema::SchemaError;

/// Result type for orchestrator operations
pub type OpsResult<T> = Result<T, OpsError>;

/// Why a request stopped or an iteration failed
#[derive(Debug, Error)]
pub enum OpsError {
    #[error(transparent)]
    Console(#[from] ConsoleError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("no table is open in this context")]
    NoOpenTable,

    #[error("no record is held by this context")]
    NoActiveRecord,

    #[error("no value is held by this context")]
    NoActiveValue,

    #[error("attribute index {index} out of range (schema has {num_attr} attributes)")]
    AttributeOutOfRange { index: usize, num_attr: usize },
}

impl OpsError {
    /// Input ran out; the session ends instead of reporting a failure
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, OpsError::Console(e) if e.is_end_of_input())
    }
}
