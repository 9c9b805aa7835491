//! Row modification

use std::io::{BufRead, Write};

use crate::console::Console;
use crate::engine::RecordEngine;
use crate::observability::{log_event_with_fields, Event, ObservationScope};
use crate::value::capture_value;

use super::context::OperationContext;
use super::errors::OpsResult;
use super::report::{finish_batch, BatchReport};
use super::{log_skip, read_count, record_iteration, select_attribute, Iteration, MatchMode};

/// Run N modifications of one attribute
///
/// The target attribute is chosen once for the whole batch. If it is out of
/// range every iteration is skipped and the engine is never asked to build a
/// record.
///
/// In [`MatchMode::Scan`] each iteration also asks for a criterion attribute
/// and value, and rewrites the target attribute of every row that matches.
pub fn update_rows<E, R, W>(
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
        "UPDATE",
        &[
            ("table", table_name.as_str()),
            ("match_mode", mode.as_str()),
            ("request_id", request_str.as_str()),
        ],
    );

    let result = update_batch(ctx, console, &table_name, mode);
    finish_batch(scope, result)
}

fn update_batch<E, R, W>(
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
    let count = read_count(console, "Modifications to perform: ")?;
    let target = select_attribute(console, ctx.schema()?, "Attribute to modify:")?;
    let mut report = BatchReport::new(count);

    match target {
        None => {
            report.skipped = count;
            if count > 0 {
                log_skip("update", request_id);
            }
        }
        Some(target) => {
            for _ in 0..count {
                let mut updated = 0;
                let result = update_one(&mut ctx, console, table_name, target, mode, &mut updated);
                if result.is_err() {
                    report.rows_affected += updated;
                }
                record_iteration(console, &mut report, result, "update", request_id)?;
                ctx.release_transients();
            }
        }
    }

    ctx.close()?;
    Ok(report)
}

fn update_one<E, R, W>(
    ctx: &mut OperationContext<'_, E>,
    console: &mut Console<R, W>,
    table_name: &str,
    target: usize,
    mode: MatchMode,
    updated: &mut usize,
) -> OpsResult<Iteration>
where
    E: RecordEngine + ?Sized,
    R: BufRead,
    W: Write,
{
    let target_type = ctx.attribute_type(target)?;

    match mode {
        MatchMode::Identity => {
            ctx.build_record()?;
            let value = capture_value(console, target_type)?;
            ctx.hold_value(value);
            ctx.bind_value(target)?;
            ctx.update_record()?;
            log_updated(table_name, &ctx.record_id()?.to_string());
            Ok(Iteration::Applied { rows: 1 })
        }
        MatchMode::Scan => {
            let selected = select_attribute(console, ctx.schema()?, "Select criterion attribute:")?;
            let Some(criterion) = selected else {
                return Ok(Iteration::Skipped);
            };
            let criterion_type = ctx.attribute_type(criterion)?;

            ctx.build_record()?;
            let criterion_value = capture_value(console, criterion_type)?;
            ctx.hold_value(criterion_value);
            let mut rows = ctx.scan_matching(criterion)?;

            let target_name = ctx.schema()?.attributes()[target].name.clone();
            console.say(&format!("New value for {}:", target_name))?;
            let value = capture_value(console, target_type)?;
            ctx.hold_value(value);
            ctx.bind_value(target)?;

            if rows.is_empty() {
                console.say("No matching entries.")?;
            }
            for row in rows.iter_mut() {
                ctx.bind_value_into(row, target)?;
                ctx.update_row(row)?;
                *updated += 1;
                log_updated(table_name, &row.id().to_string());
            }
            Ok(Iteration::Applied { rows: *updated })
        }
    }
}

fn log_updated(table_name: &str, id: &str) {
    log_event_with_fields(Event::RowUpdated, &[("table", table_name), ("id", id)]);
}
