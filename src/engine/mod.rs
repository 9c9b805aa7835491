//! Boundary to the record storage engine
//!
//! The console never lays out pages or persists anything itself. Everything
//! it does to tables goes through [`RecordEngine`], one call at a time:
//!
//! - table lifecycle: create, open, close, delete
//! - record lifecycle: create, bind attribute, release
//! - value release
//! - row operations: append, remove by id, update, plus fetch and scan
//!
//! [`MemoryEngine`] is the in-process implementation used by the binary and
//! the tests.

mod errors;
mod memory;
mod record;

pub use errors::{EngineError, EngineResult};
pub use memory::MemoryEngine;
pub use record::{Record, RecordId, TableHandle};

use crate::schema::Schema;
use crate::value::Value;

/// Operations the console issues against a storage engine
///
/// Release operations take the schema because an engine may need the row
/// shape to free a record; callers release a record before closing the
/// table whose schema it was built from.
pub trait RecordEngine {
    /// Register a new table
    fn create_table(&mut self, name: &str, schema: Schema) -> EngineResult<()>;

    /// Open a table; the handle exposes its schema
    fn open_table(&mut self, name: &str) -> EngineResult<TableHandle>;

    /// Close a handle obtained from [`RecordEngine::open_table`]
    fn close_table(&mut self, table: TableHandle) -> EngineResult<()>;

    /// Remove a table and all of its rows
    fn delete_table(&mut self, name: &str) -> EngineResult<()>;

    /// Build an empty, unstored record shaped by `schema`
    fn create_record(&mut self, schema: &Schema) -> EngineResult<Record>;

    /// Give a record back to the engine
    fn release_record(&mut self, schema: &Schema, record: Record) {
        let _ = schema;
        drop(record);
    }

    /// Store `value` in attribute `index` of `record`
    fn bind_attribute(
        &mut self,
        record: &mut Record,
        schema: &Schema,
        index: usize,
        value: &Value,
    ) -> EngineResult<()>;

    /// Give a value back to the engine
    fn release_value(&mut self, value: Value) {
        drop(value);
    }

    /// Store a complete record as a new row; the record takes the new id
    fn append(&mut self, table: &TableHandle, record: &mut Record) -> EngineResult<RecordId>;

    /// Remove the row with identity `id`
    fn remove_by_id(&mut self, table: &TableHandle, id: RecordId) -> EngineResult<()>;

    /// Overwrite the row whose identity is carried by `record`
    fn update(&mut self, table: &TableHandle, record: &Record) -> EngineResult<()>;

    /// Read one row back
    fn fetch(&mut self, table: &TableHandle, id: RecordId) -> EngineResult<Record>;

    /// Read every row, in identity order
    fn scan(&mut self, table: &TableHandle) -> EngineResult<Vec<Record>>;

    /// Stop the engine at the end of a session
    fn shutdown(&mut self) -> EngineResult<()> {
        Ok(())
    }
}
