//! Per-request resource context
//!
//! An [`OperationContext`] owns everything one CRUD request holds against the
//! engine: the open table handle, and at most one live record and one live
//! value. Teardown happens in `Drop`, so every exit path (including `?` and
//! skipped iterations) gives resources back in the same order:
//!
//! 1. held value
//! 2. held record (its release needs the table's schema)
//! 3. table handle

use uuid::Uuid;

use crate::engine::{Record, RecordEngine, RecordId, TableHandle};
use crate::observability::{log_event_with_fields, Event};
use crate::schema::{DataType, Schema};
use crate::value::Value;

use super::errors::{OpsError, OpsResult};

/// Scoped owner of one request's table, record and value
pub struct OperationContext<'e, E: RecordEngine + ?Sized> {
    engine: &'e mut E,
    table: Option<TableHandle>,
    record: Option<Record>,
    value: Option<Value>,
    request_id: Uuid,
}

impl<'e, E: RecordEngine + ?Sized> OperationContext<'e, E> {
    /// An empty context; no table is reachable until [`Self::open_table`]
    pub fn new(engine: &'e mut E) -> Self {
        Self {
            engine,
            table: None,
            record: None,
            value: None,
            request_id: Uuid::new_v4(),
        }
    }

    /// Allocate a context and open `name` into it
    pub fn open(engine: &'e mut E, name: &str) -> OpsResult<Self> {
        let mut ctx = Self::new(engine);
        ctx.open_table(name)?;
        Ok(ctx)
    }

    /// Open `name`, closing whatever this context held before
    pub fn open_table(&mut self, name: &str) -> OpsResult<()> {
        self.release_table();
        let handle = self.engine.open_table(name)?;
        let request_id = self.request_id.to_string();
        log_event_with_fields(
            Event::TableOpened,
            &[("table", name), ("request_id", request_id.as_str())],
        );
        self.table = Some(handle);
        Ok(())
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn table(&self) -> OpsResult<&TableHandle> {
        self.table.as_ref().ok_or(OpsError::NoOpenTable)
    }

    /// Schema of the open table, as provided by the engine
    pub fn schema(&self) -> OpsResult<&Schema> {
        self.table().map(TableHandle::schema)
    }

    /// Type of attribute `index` in the open table
    pub fn attribute_type(&self, index: usize) -> OpsResult<DataType> {
        let schema = self.schema()?;
        schema
            .attribute(index)
            .map(|a| a.data_type)
            .ok_or(OpsError::AttributeOutOfRange {
                index,
                num_attr: schema.num_attr(),
            })
    }

    pub fn record(&self) -> Option<&Record> {
        self.record.as_ref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Replace the held record with a fresh one shaped by the table's schema
    ///
    /// Any held value and record are released first.
    pub fn build_record(&mut self) -> OpsResult<()> {
        self.release_transients();
        let table = self.table.as_ref().ok_or(OpsError::NoOpenTable)?;
        let record = self.engine.create_record(table.schema())?;
        self.record = Some(record);
        Ok(())
    }

    /// Hold `value`, releasing any value held before
    pub fn hold_value(&mut self, value: Value) {
        self.release_value();
        self.value = Some(value);
    }

    /// Bind the held value into attribute `index` of the held record
    pub fn bind_value(&mut self, index: usize) -> OpsResult<()> {
        let table = self.table.as_ref().ok_or(OpsError::NoOpenTable)?;
        let record = self.record.as_mut().ok_or(OpsError::NoActiveRecord)?;
        let value = self.value.as_ref().ok_or(OpsError::NoActiveValue)?;
        self.engine
            .bind_attribute(record, table.schema(), index, value)?;
        Ok(())
    }

    /// Bind the held value into attribute `index` of some other record
    pub fn bind_value_into(&mut self, record: &mut Record, index: usize) -> OpsResult<()> {
        let table = self.table.as_ref().ok_or(OpsError::NoOpenTable)?;
        let value = self.value.as_ref().ok_or(OpsError::NoActiveValue)?;
        self.engine
            .bind_attribute(record, table.schema(), index, value)?;
        Ok(())
    }

    /// Append the held record as a new row
    pub fn append_record(&mut self) -> OpsResult<RecordId> {
        let table = self.table.as_ref().ok_or(OpsError::NoOpenTable)?;
        let record = self.record.as_mut().ok_or(OpsError::NoActiveRecord)?;
        Ok(self.engine.append(table, record)?)
    }

    /// Identity carried by the held record
    pub fn record_id(&self) -> OpsResult<RecordId> {
        self.record
            .as_ref()
            .map(Record::id)
            .ok_or(OpsError::NoActiveRecord)
    }

    pub fn remove_by_id(&mut self, id: RecordId) -> OpsResult<()> {
        let table = self.table.as_ref().ok_or(OpsError::NoOpenTable)?;
        Ok(self.engine.remove_by_id(table, id)?)
    }

    /// Update the row identified by the held record
    pub fn update_record(&mut self) -> OpsResult<()> {
        let table = self.table.as_ref().ok_or(OpsError::NoOpenTable)?;
        let record = self.record.as_ref().ok_or(OpsError::NoActiveRecord)?;
        Ok(self.engine.update(table, record)?)
    }

    /// Update the row identified by `record`
    pub fn update_row(&mut self, record: &Record) -> OpsResult<()> {
        let table = self.table.as_ref().ok_or(OpsError::NoOpenTable)?;
        Ok(self.engine.update(table, record)?)
    }

    /// Rows whose attribute `index` equals the held value
    pub fn scan_matching(&mut self, index: usize) -> OpsResult<Vec<Record>> {
        let table = self.table.as_ref().ok_or(OpsError::NoOpenTable)?;
        let value = self.value.as_ref().ok_or(OpsError::NoActiveValue)?;
        let rows = self.engine.scan(table)?;
        Ok(rows
            .into_iter()
            .filter(|row| row.value(index) == Some(value))
            .collect())
    }

    /// Release the held value, if any
    pub fn release_value(&mut self) {
        if let Some(value) = self.value.take() {
            self.engine.release_value(value);
        }
    }

    /// Release the held record, if any
    pub fn release_record(&mut self) {
        if let Some(record) = self.record.take() {
            match self.table.as_ref() {
                Some(table) => self.engine.release_record(table.schema(), record),
                None => drop(record),
            }
        }
    }

    /// Release the held value, then the held record
    pub fn release_transients(&mut self) {
        self.release_value();
        self.release_record();
    }

    /// Tear down explicitly, reporting a failed table close
    pub fn close(mut self) -> OpsResult<()> {
        self.release_transients();
        match self.table.take() {
            Some(table) => {
                let name = table.name().to_string();
                self.engine.close_table(table)?;
                self.log_closed(&name);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn release_table(&mut self) {
        self.release_transients();
        if let Some(table) = self.table.take() {
            let name = table.name().to_string();
            match self.engine.close_table(table) {
                Ok(()) => self.log_closed(&name),
                Err(err) => {
                    let request_id = self.request_id.to_string();
                    let reason = err.to_string();
                    log_event_with_fields(
                        Event::TableCloseFailed,
                        &[
                            ("table", name.as_str()),
                            ("request_id", request_id.as_str()),
                            ("reason", reason.as_str()),
                        ],
                    );
                }
            }
        }
    }

    fn log_closed(&self, name: &str) {
        let request_id = self.request_id.to_string();
        log_event_with_fields(
            Event::TableClosed,
            &[("table", name), ("request_id", request_id.as_str())],
        );
    }
}

impl<E: RecordEngine + ?Sized> Drop for OperationContext<'_, E> {
    fn drop(&mut self) {
        self.release_table();
    }
}
