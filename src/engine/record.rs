//! Record and table handle types exchanged with the engine

use std::fmt;
use std::sync::Arc;

use crate::schema::Schema;
use crate::value::Value;

/// Engine-assigned row identity: a page number and a slot within the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId {
    pub page: u32,
    pub slot: u32,
}

impl RecordId {
    /// Identity carried by a record that was never stored
    pub const UNASSIGNED: RecordId = RecordId {
        page: u32::MAX,
        slot: u32::MAX,
    };

    pub fn new(page: u32, slot: u32) -> Self {
        Self { page, slot }
    }

    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_assigned() {
            write!(f, "{}:{}", self.page, self.slot)
        } else {
            f.write_str("unassigned")
        }
    }
}

/// One row: identity plus one value slot per schema attribute
///
/// A record is only meaningful against the schema it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: RecordId,
    values: Vec<Option<Value>>,
}

impl Record {
    /// An unstored record with `num_attr` empty slots
    pub fn new(num_attr: usize) -> Self {
        Self {
            id: RecordId::UNASSIGNED,
            values: vec![None; num_attr],
        }
    }

    /// A stored record
    pub fn with_values(id: RecordId, values: Vec<Value>) -> Self {
        Self {
            id,
            values: values.into_iter().map(Some).collect(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    /// Number of value slots
    pub fn width(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    /// Store `value` in slot `index`; returns false when the slot does not exist
    pub fn set_value(&mut self, index: usize, value: Value) -> bool {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => false,
        }
    }

    /// Index of the first slot without a value
    pub fn first_unbound(&self) -> Option<usize> {
        self.values.iter().position(Option::is_none)
    }
}

/// An open table, as handed out by [`RecordEngine::open_table`]
///
/// The schema belongs to the engine; the handle shares it.
///
/// [`RecordEngine::open_table`]: super::RecordEngine::open_table
#[derive(Debug, Clone)]
pub struct TableHandle {
    name: String,
    schema: Arc<Schema>,
}

impl TableHandle {
    pub fn new(name: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_record_is_unassigned_and_empty() {
        let record = Record::new(3);
        assert_eq!(record.id(), RecordId::UNASSIGNED);
        assert!(!record.id().is_assigned());
        assert_eq!(record.width(), 3);
        assert_eq!(record.first_unbound(), Some(0));
    }

    #[test]
    fn test_set_value() {
        let mut record = Record::new(2);
        assert!(record.set_value(1, Value::int(9)));
        assert!(!record.set_value(2, Value::int(9)));
        assert_eq!(record.value(1), Some(&Value::int(9)));
        assert_eq!(record.first_unbound(), Some(0));
        assert!(record.set_value(0, Value::bool(true)));
        assert_eq!(record.first_unbound(), None);
    }

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId::new(2, 5).to_string(), "2:5");
        assert_eq!(RecordId::UNASSIGNED.to_string(), "unassigned");
    }
}
