//! Row insertion

use std::io::{BufRead, Write};

use crate::console::Console;
use crate::engine::{EngineError, RecordEngine};
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::value::capture_value;

use super::context::OperationContext;
use super::errors::{OpsError, OpsResult};
use super::report::{finish_batch, BatchReport};
use super::{read_count, record_iteration, Iteration};

/// Insert N full rows into a table
///
/// For every row each attribute is captured and bound in schema order, then
/// the record is appended. A bind failure does not stop the remaining
/// captures for that row (so the input stays aligned), but the row is not
/// appended.
pub fn insert_rows<E, R, W>(engine: &mut E, console: &mut Console<R, W>) -> OpsResult<BatchReport>
where
    E: RecordEngine + ?Sized,
    R: BufRead,
    W: Write,
{
    let table_name = console.ask_name("Target table: ")?;
    let ctx = OperationContext::open(engine, &table_name)?;
    let request_str = ctx.request_id().to_string();
    let scope = ObservationScope::with_fields(
        "INSERT",
        &[("table", table_name.as_str()), ("request_id", request_str.as_str())],
    );

    let result = insert_batch(ctx, console, &table_name);
    finish_batch(scope, result)
}

fn insert_batch<E, R, W>(
    mut ctx: OperationContext<'_, E>,
    console: &mut Console<R, W>,
    table_name: &str,
) -> OpsResult<BatchReport>
where
    E: RecordEngine + ?Sized,
    R: BufRead,
    W: Write,
{
    let request_id = ctx.request_id();
    let count = read_count(console, "Entries to add: ")?;
    let mut report = BatchReport::new(count);

    for _ in 0..count {
        let result = insert_one(&mut ctx, console, table_name);
        record_iteration(console, &mut report, result, "append", request_id)?;
        ctx.release_transients();
    }

    ctx.close()?;
    Ok(report)
}

fn insert_one<E, R, W>(
    ctx: &mut OperationContext<'_, E>,
    console: &mut Console<R, W>,
    table_name: &str,
) -> OpsResult<Iteration>
where
    E: RecordEngine + ?Sized,
    R: BufRead,
    W: Write,
{
    ctx.build_record()?;
    let attributes = ctx.schema()?.attributes().to_vec();
    let total = attributes.len();

    let mut first_failure: Option<EngineError> = None;
    for (index, attr) in attributes.iter().enumerate() {
        console.prompt(&format!("{} ({}/{}): ", attr.name, index + 1, total))?;
        let value = capture_value(console, attr.data_type)?;
        ctx.hold_value(value);
        match ctx.bind_value(index) {
            Ok(()) => {}
            Err(OpsError::Engine(err)) => {
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
            Err(other) => return Err(other),
        }
        ctx.release_value();
    }

    if let Some(err) = first_failure {
        return Err(err.into());
    }

    let id = ctx.append_record()?;
    let id = id.to_string();
    log_event_with_fields(Event::RowAppended, &[("table", table_name), ("id", id.as_str())]);
    Ok(Iteration::Applied { rows: 1 })
}
