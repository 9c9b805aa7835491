//! Row deletion

use std::io::{BufRead, Write};

use crate::console::Console;
use crate::engine::RecordEngine;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::value::capture_value;

use super::context::OperationContext;
use super::errors::OpsResult;
use super::report::{finish_batch, BatchReport};
use super::{read_count, record_iteration, select_attribute, Iteration, MatchMode};

/// Run N deletions against a table
///
/// Each iteration picks a criterion attribute and captures a value for it.
/// The index is checked before anything is asked of the engine; an
/// out-of-range index skips the iteration. Rows removed before a failing
/// removal still count toward `rows_affected`.
pub fn delete_rows<E, R, W>(
    engine: &mut E,
    console: &mut Console<R, W>,
    mode: MatchMode,
) -> OpsResult<BatchReport>
where
    E: RecordEngine + ?Sized,
    R: BufRead,
    W: Write,
{
    let table_name = console.ask_name("Target table: ")?;
    let ctx = OperationContext::open(engine, &table_name)?;
    let request_str = ctx.request_id().to_string();
    let scope = ObservationScope::with_fields(
        "DELETE",
        &[
            ("table", table_name.as_str()),
            ("match_mode", mode.as_str()),
            ("request_id", request_str.as_str()),
        ],
    );

    let result = delete_batch(ctx, console, &table_name, mode);
    finish_batch(scope, result)
}

fn delete_batch<E, R, W>(
    mut ctx: OperationContext<'_, E>,
    console: &mut Console<R, W>,
    table_name: &str,
    mode: MatchMode,
) -> OpsResult<BatchReport>
where
    E: RecordEngine + ?Sized,
    R: BufRead,
    W: Write,
{
    let request_id = ctx.request_id();
    let count = read_count(console, "Deletions to perform: ")?;
    let mut report = BatchReport::new(count);

    for _ in 0..count {
        let mut removed = 0;
        let result = delete_one(&mut ctx, console, table_name, mode, &mut removed);
        if result.is_err() {
            report.rows_affected += removed;
        }
        record_iteration(console, &mut report, result, "delete", request_id)?;
        ctx.release_transients();
    }

    ctx.close()?;
    Ok(report)
}

fn delete_one<E, R, W>(
    ctx: &mut OperationContext<'_, E>,
    console: &mut Console<R, W>,
    table_name: &str,
    mode: MatchMode,
    removed: &mut usize,
) -> OpsResult<Iteration>
where
    E: RecordEngine + ?Sized,
    R: BufRead,
    W: Write,
{
    let selected = select_attribute(console, ctx.schema()?, "Select criterion attribute:")?;
    let Some(index) = selected else {
        return Ok(Iteration::Skipped);
    };
    let data_type = ctx.attribute_type(index)?;

    ctx.build_record()?;
    let value = capture_value(console, data_type)?;
    ctx.hold_value(value);
    ctx.bind_value(index)?;

    let targets = match mode {
        MatchMode::Identity => vec![ctx.record_id()?],
        MatchMode::Scan => {
            let rows = ctx.scan_matching(index)?;
            if rows.is_empty() {
                console.say("No matching entries.")?;
            }
            rows.iter().map(|row| row.id()).collect()
        }
    };

    for id in &targets {
        ctx.remove_by_id(*id)?;
        *removed += 1;
        let id = id.to_string();
        log_event_with_fields(Event::RowRemoved, &[("table", table_name), ("id", id.as_str())]);
    }

    Ok(Iteration::Applied { rows: *removed })
}
