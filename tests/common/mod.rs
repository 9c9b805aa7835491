//! Shared test helpers
//!
//! `RecordingEngine` forwards every call to a `MemoryEngine` and keeps a log
//! of what was asked, so tests can assert on call order and counts.

#![allow(dead_code)]

use std::num::NonZeroUsize;

use rmconsole::console::{Console, InputLimits};
use rmconsole::engine::{
    EngineError, EngineResult, MemoryEngine, Record, RecordEngine, RecordId, TableHandle,
};
use rmconsole::schema::{AttributeDef, DataType, Schema};
use rmconsole::value::Value;

/// One engine call as seen by the recorder
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateTable(String),
    OpenTable(String),
    CloseTable(String),
    DeleteTable(String),
    CreateRecord,
    ReleaseRecord,
    Bind { index: usize, value: Value },
    ReleaseValue,
    Append(Vec<Option<Value>>),
    RemoveById(RecordId),
    Update(RecordId),
    Fetch(RecordId),
    Scan,
    Shutdown,
}

#[derive(Default)]
pub struct RecordingEngine {
    pub inner: MemoryEngine,
    pub calls: Vec<Call>,
    /// Refuse every remove or update after this many have been issued
    pub refuse_row_ops_after: Option<usize>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn row_op_refused(&self) -> bool {
        match self.refuse_row_ops_after {
            Some(limit) => self.count(|c| matches!(c, Call::RemoveById(_) | Call::Update(_))) > limit,
            None => false,
        }
    }

    pub fn appended(&self) -> Vec<Vec<Option<Value>>> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Append(values) => Some(values.clone()),
                _ => None,
            })
            .collect()
    }
}

impl RecordEngine for RecordingEngine {
    fn create_table(&mut self, name: &str, schema: Schema) -> EngineResult<()> {
        self.calls.push(Call::CreateTable(name.to_string()));
        self.inner.create_table(name, schema)
    }

    fn open_table(&mut self, name: &str) -> EngineResult<TableHandle> {
        self.calls.push(Call::OpenTable(name.to_string()));
        self.inner.open_table(name)
    }

    fn close_table(&mut self, table: TableHandle) -> EngineResult<()> {
        self.calls.push(Call::CloseTable(table.name().to_string()));
        self.inner.close_table(table)
    }

    fn delete_table(&mut self, name: &str) -> EngineResult<()> {
        self.calls.push(Call::DeleteTable(name.to_string()));
        self.inner.delete_table(name)
    }

    fn create_record(&mut self, schema: &Schema) -> EngineResult<Record> {
        self.calls.push(Call::CreateRecord);
        self.inner.create_record(schema)
    }

    fn release_record(&mut self, schema: &Schema, record: Record) {
        self.calls.push(Call::ReleaseRecord);
        self.inner.release_record(schema, record)
    }

    fn bind_attribute(
        &mut self,
        record: &mut Record,
        schema: &Schema,
        index: usize,
        value: &Value,
    ) -> EngineResult<()> {
        self.calls.push(Call::Bind {
            index,
            value: value.clone(),
        });
        self.inner.bind_attribute(record, schema, index, value)
    }

    fn release_value(&mut self, value: Value) {
        self.calls.push(Call::ReleaseValue);
        self.inner.release_value(value)
    }

    fn append(&mut self, table: &TableHandle, record: &mut Record) -> EngineResult<RecordId> {
        self.calls.push(Call::Append(record.values().to_vec()));
        self.inner.append(table, record)
    }

    fn remove_by_id(&mut self, table: &TableHandle, id: RecordId) -> EngineResult<()> {
        self.calls.push(Call::RemoveById(id));
        if self.row_op_refused() {
            return Err(EngineError::RecordNotFound(id));
        }
        self.inner.remove_by_id(table, id)
    }

    fn update(&mut self, table: &TableHandle, record: &Record) -> EngineResult<()> {
        self.calls.push(Call::Update(record.id()));
        if self.row_op_refused() {
            return Err(EngineError::RecordNotFound(record.id()));
        }
        self.inner.update(table, record)
    }

    fn fetch(&mut self, table: &TableHandle, id: RecordId) -> EngineResult<Record> {
        self.calls.push(Call::Fetch(id));
        self.inner.fetch(table, id)
    }

    fn scan(&mut self, table: &TableHandle) -> EngineResult<Vec<Record>> {
        self.calls.push(Call::Scan);
        self.inner.scan(table)
    }

    fn shutdown(&mut self) -> EngineResult<()> {
        self.calls.push(Call::Shutdown);
        self.inner.shutdown()
    }
}

/// `{id: int, name: string(50)}`
pub fn people_schema() -> Schema {
    Schema::new(
        vec![
            AttributeDef::scalar("id", DataType::Int),
            AttributeDef::text("name", NonZeroUsize::new(50).unwrap()),
        ],
        vec![],
    )
    .unwrap()
}

/// A recorder with an empty `people` table and a clean call log
pub fn people_engine() -> RecordingEngine {
    let mut engine = RecordingEngine::new();
    engine.create_table("people", people_schema()).unwrap();
    engine.clear();
    engine
}

pub fn console(input: &str) -> Console<&[u8], Vec<u8>> {
    Console::new(input.as_bytes(), Vec::new(), InputLimits::default())
}

pub fn output(console: Console<&[u8], Vec<u8>>) -> String {
    let (_, out) = console.into_inner();
    String::from_utf8(out).unwrap()
}
