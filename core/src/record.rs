//! Record structure.
//!
//! A `Record` is the in-memory, possibly modified snapshot of a stored entity.
//! The committed snapshot lives in the store; the two are compared to find
//! changed fields.

use crate::{Fields, RecordId, TypeId, Value};

/// An in-memory record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Primary key. Allocated before the record is first persisted.
    pub id: RecordId,
    /// Record type (reference to the schema).
    pub type_id: TypeId,
    /// Field values as currently held in memory.
    pub fields: Fields,
}

impl Record {
    /// Create a new record with the given properties.
    pub fn new(id: RecordId, type_id: TypeId, fields: Fields) -> Self {
        Self {
            id,
            type_id,
            fields,
        }
    }

    /// Get a field value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a field value by name, reading a missing field as `Null`.
    pub fn value(&self, name: &str) -> Value {
        self.fields.get(name).cloned().unwrap_or(Value::Null)
    }

    /// Set a field value. Only the in-memory snapshot changes.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`Record::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Convenience accessor for string fields.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }
}
