//! In-process record engine
//!
//! Tables live in memory for the lifetime of the process. Row identities are
//! handed out sequentially, `SLOTS_PER_PAGE` slots to a page, and are never
//! reused within a table.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::schema::{DataType, Schema};
use crate::value::Value;

use super::errors::{EngineError, EngineResult};
use super::record::{Record, RecordId, TableHandle};
use super::RecordEngine;

const SLOTS_PER_PAGE: u64 = 64;

#[derive(Debug)]
struct TableData {
    schema: Arc<Schema>,
    rows: BTreeMap<RecordId, Vec<Value>>,
    next_seq: u64,
    open_handles: usize,
}

impl TableData {
    fn new(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
            rows: BTreeMap::new(),
            next_seq: 0,
            open_handles: 0,
        }
    }

    fn allocate_id(&mut self) -> RecordId {
        let seq = self.next_seq;
        self.next_seq += 1;
        RecordId::new((seq / SLOTS_PER_PAGE) as u32, (seq % SLOTS_PER_PAGE) as u32)
    }
}

/// Record engine keeping every table in memory
#[derive(Debug, Default)]
pub struct MemoryEngine {
    tables: HashMap<String, TableData>,
    live_records: usize,
    shut_down: bool,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records created and not yet released
    pub fn live_records(&self) -> usize {
        self.live_records
    }

    /// Handles currently open on `name`
    pub fn open_handles(&self, name: &str) -> usize {
        self.tables.get(name).map_or(0, |t| t.open_handles)
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Stored rows in `name`
    pub fn row_count(&self, name: &str) -> usize {
        self.tables.get(name).map_or(0, |t| t.rows.len())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    fn ensure_running(&self) -> EngineResult<()> {
        if self.shut_down {
            return Err(EngineError::ShutDown);
        }
        Ok(())
    }

    fn table_mut(&mut self, name: &str) -> EngineResult<&mut TableData> {
        self.ensure_running()?;
        self.tables
            .get_mut(name)
            .ok_or_else(|| EngineError::TableNotFound(name.to_string()))
    }

    fn complete_values(schema: &Schema, record: &Record) -> EngineResult<Vec<Value>> {
        if record.width() != schema.num_attr() {
            return Err(EngineError::ShapeMismatch {
                expected: schema.num_attr(),
                actual: record.width(),
            });
        }
        if let Some(index) = record.first_unbound() {
            let name = schema
                .attribute(index)
                .map(|attr| attr.name.clone())
                .unwrap_or_default();
            return Err(EngineError::UnboundAttribute(name));
        }
        Ok(record.values().iter().flatten().cloned().collect())
    }
}

impl RecordEngine for MemoryEngine {
    fn create_table(&mut self, name: &str, schema: Schema) -> EngineResult<()> {
        self.ensure_running()?;
        if self.tables.contains_key(name) {
            return Err(EngineError::TableExists(name.to_string()));
        }
        self.tables.insert(name.to_string(), TableData::new(schema));
        Ok(())
    }

    fn open_table(&mut self, name: &str) -> EngineResult<TableHandle> {
        let table = self.table_mut(name)?;
        table.open_handles += 1;
        Ok(TableHandle::new(name, Arc::clone(&table.schema)))
    }

    fn close_table(&mut self, table: TableHandle) -> EngineResult<()> {
        let data = self.table_mut(table.name())?;
        if data.open_handles == 0 {
            return Err(EngineError::TableNotOpen(table.name().to_string()));
        }
        data.open_handles -= 1;
        Ok(())
    }

    fn delete_table(&mut self, name: &str) -> EngineResult<()> {
        let data = self.table_mut(name)?;
        if data.open_handles > 0 {
            return Err(EngineError::TableInUse(name.to_string()));
        }
        self.tables.remove(name);
        Ok(())
    }

    fn create_record(&mut self, schema: &Schema) -> EngineResult<Record> {
        self.ensure_running()?;
        self.live_records += 1;
        Ok(Record::new(schema.num_attr()))
    }

    fn release_record(&mut self, _schema: &Schema, record: Record) {
        self.live_records = self.live_records.saturating_sub(1);
        drop(record);
    }

    fn bind_attribute(
        &mut self,
        record: &mut Record,
        schema: &Schema,
        index: usize,
        value: &Value,
    ) -> EngineResult<()> {
        self.ensure_running()?;
        let attr = schema
            .attribute(index)
            .ok_or(EngineError::AttributeOutOfRange {
                index,
                num_attr: schema.num_attr(),
            })?;

        if value.data_type() != attr.data_type {
            return Err(EngineError::TypeMismatch {
                attribute: attr.name.clone(),
                expected: attr.data_type,
                actual: value.data_type(),
            });
        }

        if let (DataType::Text, Some(text)) = (attr.data_type, value.as_text()) {
            if text.len() > attr.size() {
                return Err(EngineError::ValueTooLong {
                    attribute: attr.name.clone(),
                    len: text.len(),
                    capacity: attr.size(),
                });
            }
        }

        if !record.set_value(index, value.clone()) {
            return Err(EngineError::ShapeMismatch {
                expected: schema.num_attr(),
                actual: record.width(),
            });
        }
        Ok(())
    }

    fn append(&mut self, table: &TableHandle, record: &mut Record) -> EngineResult<RecordId> {
        let data = self.table_mut(table.name())?;
        let values = Self::complete_values(&data.schema, record)?;
        let id = data.allocate_id();
        data.rows.insert(id, values);
        record.set_id(id);
        Ok(id)
    }

    fn remove_by_id(&mut self, table: &TableHandle, id: RecordId) -> EngineResult<()> {
        let data = self.table_mut(table.name())?;
        data.rows
            .remove(&id)
            .map(|_| ())
            .ok_or(EngineError::RecordNotFound(id))
    }

    fn update(&mut self, table: &TableHandle, record: &Record) -> EngineResult<()> {
        let data = self.table_mut(table.name())?;
        if !data.rows.contains_key(&record.id()) {
            return Err(EngineError::RecordNotFound(record.id()));
        }
        let values = Self::complete_values(&data.schema, record)?;
        data.rows.insert(record.id(), values);
        Ok(())
    }

    fn fetch(&mut self, table: &TableHandle, id: RecordId) -> EngineResult<Record> {
        let data = self.table_mut(table.name())?;
        data.rows
            .get(&id)
            .map(|values| Record::with_values(id, values.clone()))
            .ok_or(EngineError::RecordNotFound(id))
    }

    fn scan(&mut self, table: &TableHandle) -> EngineResult<Vec<Record>> {
        let data = self.table_mut(table.name())?;
        Ok(data
            .rows
            .iter()
            .map(|(id, values)| Record::with_values(*id, values.clone()))
            .collect())
    }

    fn shutdown(&mut self) -> EngineResult<()> {
        self.ensure_running()?;
        self.shut_down = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::AttributeDef;
    use std::num::NonZeroUsize;

    fn people() -> Schema {
        Schema::new(
            vec![
                AttributeDef::scalar("id", DataType::Int),
                AttributeDef::text("name", NonZeroUsize::new(5).unwrap()),
            ],
            vec![],
        )
        .unwrap()
    }

    fn engine_with_people() -> (MemoryEngine, TableHandle) {
        let mut engine = MemoryEngine::new();
        engine.create_table("people", people()).unwrap();
        let handle = engine.open_table("people").unwrap();
        (engine, handle)
    }

    fn row(engine: &mut MemoryEngine, schema: &Schema, id: i64, name: &str) -> Record {
        let mut record = engine.create_record(schema).unwrap();
        engine
            .bind_attribute(&mut record, schema, 0, &Value::int(id))
            .unwrap();
        engine
            .bind_attribute(&mut record, schema, 1, &Value::text(name))
            .unwrap();
        record
    }

    #[test]
    fn test_create_twice_fails() {
        let mut engine = MemoryEngine::new();
        engine.create_table("t", people()).unwrap();
        assert_eq!(
            engine.create_table("t", people()),
            Err(EngineError::TableExists("t".into()))
        );
    }

    #[test]
    fn test_open_unknown_table() {
        let mut engine = MemoryEngine::new();
        assert!(matches!(
            engine.open_table("nope"),
            Err(EngineError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_append_then_fetch_round_trip() {
        let (mut engine, handle) = engine_with_people();
        let schema = handle.schema().clone();
        let mut record = row(&mut engine, &schema, 1, "alice");
        let id = engine.append(&handle, &mut record).unwrap();
        assert_eq!(record.id(), id);

        let fetched = engine.fetch(&handle, id).unwrap();
        assert_eq!(fetched.value(0), Some(&Value::int(1)));
        assert_eq!(fetched.value(1), Some(&Value::text("alice")));
    }

    #[test]
    fn test_ids_are_sequential_across_pages() {
        let (mut engine, handle) = engine_with_people();
        let schema = handle.schema().clone();
        let mut last = RecordId::UNASSIGNED;
        for i in 0..=SLOTS_PER_PAGE as i64 {
            let mut record = row(&mut engine, &schema, i, "x");
            last = engine.append(&handle, &mut record).unwrap();
        }
        assert_eq!(last, RecordId::new(1, 0));
    }

    #[test]
    fn test_append_incomplete_record_fails() {
        let (mut engine, handle) = engine_with_people();
        let schema = handle.schema().clone();
        let mut record = engine.create_record(&schema).unwrap();
        engine
            .bind_attribute(&mut record, &schema, 0, &Value::int(1))
            .unwrap();
        assert_eq!(
            engine.append(&handle, &mut record),
            Err(EngineError::UnboundAttribute("name".into()))
        );
    }

    #[test]
    fn test_bind_checks_type_and_capacity() {
        let (mut engine, handle) = engine_with_people();
        let schema = handle.schema().clone();
        let mut record = engine.create_record(&schema).unwrap();

        assert!(matches!(
            engine.bind_attribute(&mut record, &schema, 0, &Value::text("1")),
            Err(EngineError::TypeMismatch { .. })
        ));
        assert!(matches!(
            engine.bind_attribute(&mut record, &schema, 1, &Value::text("toolong")),
            Err(EngineError::ValueTooLong { len: 7, capacity: 5, .. })
        ));
        assert!(matches!(
            engine.bind_attribute(&mut record, &schema, 2, &Value::int(1)),
            Err(EngineError::AttributeOutOfRange { index: 2, num_attr: 2 })
        ));
    }

    #[test]
    fn test_remove_unassigned_id_is_not_found() {
        let (mut engine, handle) = engine_with_people();
        assert_eq!(
            engine.remove_by_id(&handle, RecordId::UNASSIGNED),
            Err(EngineError::RecordNotFound(RecordId::UNASSIGNED))
        );
    }

    #[test]
    fn test_update_overwrites_row() {
        let (mut engine, handle) = engine_with_people();
        let schema = handle.schema().clone();
        let mut record = row(&mut engine, &schema, 1, "alice");
        let id = engine.append(&handle, &mut record).unwrap();

        engine
            .bind_attribute(&mut record, &schema, 1, &Value::text("al"))
            .unwrap();
        engine.update(&handle, &record).unwrap();
        assert_eq!(
            engine.fetch(&handle, id).unwrap().value(1),
            Some(&Value::text("al"))
        );
    }

    #[test]
    fn test_scan_in_id_order() {
        let (mut engine, handle) = engine_with_people();
        let schema = handle.schema().clone();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            let mut record = row(&mut engine, &schema, i as i64, name);
            engine.append(&handle, &mut record).unwrap();
        }
        let names: Vec<_> = engine
            .scan(&handle)
            .unwrap()
            .iter()
            .map(|r| r.value(1).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_open_table_cannot_be_deleted() {
        let (mut engine, handle) = engine_with_people();
        assert_eq!(
            engine.delete_table("people"),
            Err(EngineError::TableInUse("people".into()))
        );
        engine.close_table(handle).unwrap();
        engine.delete_table("people").unwrap();
        assert!(!engine.has_table("people"));
    }

    #[test]
    fn test_close_twice_fails() {
        let (mut engine, handle) = engine_with_people();
        engine.close_table(handle.clone()).unwrap();
        assert_eq!(
            engine.close_table(handle),
            Err(EngineError::TableNotOpen("people".into()))
        );
    }

    #[test]
    fn test_record_accounting() {
        let mut engine = MemoryEngine::new();
        let schema = people();
        let record = engine.create_record(&schema).unwrap();
        assert_eq!(engine.live_records(), 1);
        engine.release_record(&schema, record);
        assert_eq!(engine.live_records(), 0);
    }

    #[test]
    fn test_calls_after_shutdown_fail() {
        let mut engine = MemoryEngine::new();
        engine.shutdown().unwrap();
        assert!(engine.is_shut_down());
        assert_eq!(engine.create_table("t", people()), Err(EngineError::ShutDown));
    }
}
