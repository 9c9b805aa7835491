//! Observable events of a console session
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Session lifecycle
    /// Menu loop entered
    SessionBegin,
    /// Menu loop left, engine shut down
    SessionEnd,
    /// Engine refused to shut down at session end
    EngineShutdownFailed,
    /// Configuration loaded and validated
    ConfigLoaded,

    // Table lifecycle
    /// Table created from a configured schema
    TableCreated,
    /// Table removed
    TableRemoved,
    /// Table opened into an operation context
    TableOpened,
    /// Table closed during context teardown
    TableClosed,
    /// Table close refused by the engine during context teardown
    TableCloseFailed,

    // Schema configuration
    /// Unrecognized type code coerced to the default type
    TypeCodeDefaulted,

    // Row operations
    /// Row appended
    RowAppended,
    /// Row removed
    RowRemoved,
    /// Row updated
    RowUpdated,
    /// Iteration skipped because of an out-of-range attribute index
    IterationSkipped,
    /// Engine call failed; the batch continues
    EngineOpFailed,

    // Requests
    /// Request aborted before completion
    RequestAborted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SessionBegin => "SESSION_BEGIN",
            Event::SessionEnd => "SESSION_END",
            Event::EngineShutdownFailed => "ENGINE_SHUTDOWN_FAILED",
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::TableCreated => "TABLE_CREATED",
            Event::TableRemoved => "TABLE_REMOVED",
            Event::TableOpened => "TABLE_OPENED",
            Event::TableClosed => "TABLE_CLOSED",
            Event::TableCloseFailed => "TABLE_CLOSE_FAILED",

            Event::TypeCodeDefaulted => "TYPE_CODE_DEFAULTED",

            Event::RowAppended => "ROW_APPENDED",
            Event::RowRemoved => "ROW_REMOVED",
            Event::RowUpdated => "ROW_UPDATED",
            Event::IterationSkipped => "ITERATION_SKIPPED",
            Event::EngineOpFailed => "ENGINE_OP_FAILED",

            Event::RequestAborted => "REQUEST_ABORTED",
        }
    }

    /// Returns true if the event reports something the user should look at
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::EngineShutdownFailed
                | Event::TableCloseFailed
                | Event::TypeCodeDefaulted
                | Event::IterationSkipped
                | Event::EngineOpFailed
                | Event::RequestAborted
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
