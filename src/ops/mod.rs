//! CRUD orchestration
//!
//! Every row request runs the same state machine against one opened table:
//!
//! ```text
//! OPEN_TABLE
//!   loop N times:
//!     BUILD_RECORD -> SELECT_ATTR -> CAPTURE_VALUE -> BIND_ATTR
//!       -> ENGINE_OP -> RELEASE_RECORD_AND_VALUE
//! CLOSE_TABLE -> RELEASE_CONTEXT
//! ```
//!
//! N bounds loop iterations, not successful engine operations. A failed
//! engine call is reported and the loop moves on; an out-of-range attribute
//! index skips the iteration body without touching the engine.

mod context;
mod delete;
mod errors;
mod insert;
mod report;
mod update;

pub use context::OperationContext;
pub use delete::delete_rows;
pub use errors::{OpsError, OpsResult};
pub use insert::insert_rows;
pub use report::BatchReport;
pub use update::update_rows;

use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::console::{Console, ConsoleResult};
use crate::engine::EngineError;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::Schema;

/// How deletion and modification find the rows they act on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Scan the table and act on every row whose criterion attribute equals
    /// the captured value
    #[default]
    Scan,
    /// Act on the identity of the freshly built record. That record was
    /// never stored, so the engine reports it as not found: no row matches.
    Identity,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Scan => "scan",
            MatchMode::Identity => "identity",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scan" => Ok(MatchMode::Scan),
            "identity" => Ok(MatchMode::Identity),
            other => Err(format!(
                "unknown match mode '{}' (expected scan or identity)",
                other
            )),
        }
    }
}

/// Outcome of one loop iteration that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Iteration {
    Applied { rows: usize },
    Skipped,
}

/// Read an iteration count; negative counts run no iterations
pub(crate) fn read_count<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    prompt: &str,
) -> ConsoleResult<usize> {
    let raw = console.ask_i64(prompt)?;
    Ok(usize::try_from(raw).unwrap_or(0))
}

/// List attributes under `header` and read an index
///
/// Returns `None` when the index is outside `0..schema.num_attr()`.
pub(crate) fn select_attribute<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    schema: &Schema,
    header: &str,
) -> ConsoleResult<Option<usize>> {
    console.say(header)?;
    for (index, attr) in schema.attributes().iter().enumerate() {
        console.say(&format!("[{}] {}", index, attr.name))?;
    }
    let raw = console.ask_i64("")?;
    Ok(usize::try_from(raw)
        .ok()
        .filter(|&index| index < schema.num_attr()))
}

/// Fold one iteration result into `report`
///
/// Engine failures are printed and counted; every other error ends the
/// request.
pub(crate) fn record_iteration<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    report: &mut BatchReport,
    result: OpsResult<Iteration>,
    op: &str,
    request_id: Uuid,
) -> OpsResult<()> {
    match result {
        Ok(Iteration::Applied { rows }) => {
            report.applied += 1;
            report.rows_affected += rows;
        }
        Ok(Iteration::Skipped) => {
            report.skipped += 1;
            log_skip(op, request_id);
        }
        Err(OpsError::Engine(err)) => {
            report.failed += 1;
            report_engine_failure(console, op, &err, request_id)?;
        }
        Err(other) => return Err(other),
    }
    Ok(())
}

pub(crate) fn log_skip(op: &str, request_id: Uuid) {
    let request_id = request_id.to_string();
    log_event_with_fields(
        Event::IterationSkipped,
        &[
            ("op", op),
            ("reason", "attribute index out of range"),
            ("request_id", request_id.as_str()),
        ],
    );
}

fn report_engine_failure<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    op: &str,
    err: &EngineError,
    request_id: Uuid,
) -> ConsoleResult<()> {
    let reason = err.to_string();
    let request_id = request_id.to_string();
    log_event_with_fields(
        Event::EngineOpFailed,
        &[
            ("op", op),
            ("kind", err.kind()),
            ("reason", reason.as_str()),
            ("request_id", request_id.as_str()),
        ],
    );
    console.say(&format!("Operation failed: {}", reason))
}
