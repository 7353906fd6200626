//! `RecordSource` view of the store.

use crate::Store;
use latch_core::{Record, RecordId, RecordSource, SchemaField, TypeId, Value};
use std::collections::BTreeSet;

impl RecordSource for Store {
    fn schema_field(&self, type_id: TypeId, name: &str) -> Option<SchemaField> {
        self.schema().field(type_id, name)
    }

    fn type_name(&self, type_id: TypeId) -> Option<String> {
        self.schema().get_type(type_id).map(|t| t.name.clone())
    }

    fn load(&self, id: RecordId) -> Option<Record> {
        self.get(id).cloned()
    }

    fn is_persisted(&self, id: RecordId) -> bool {
        self.contains(id)
    }

    fn persisted_value(&self, id: RecordId, field: &str) -> Option<Value> {
        self.stored_value(id, field)
    }

    fn referencing(&self, id: RecordId, field: &SchemaField) -> Vec<RecordId> {
        match (field.target, field.remote_field.as_deref()) {
            (Some(source_type), Some(remote)) => Store::referencing(self, id, source_type, remote),
            _ => Vec::new(),
        }
    }

    fn changed_fields(&self, record: &Record) -> BTreeSet<String> {
        self.diff(record)
    }
}
