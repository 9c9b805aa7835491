//! Observability for the console
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Request scopes
//!
//! Observability is read-only: nothing here changes what a request does.

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::ObservationScope;

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
///
/// Warning-class events go out at WARN, everything else at INFO.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}
