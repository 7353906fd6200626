//! The record-store seam.
//!
//! Rule evaluation never touches storage directly. Everything it needs to know
//! about schema metadata, committed values and relations goes through
//! `RecordSource`, so any store can be guarded by implementing it.

use std::collections::BTreeSet;

use crate::{Record, RecordId, SchemaField, TypeId, Value};

/// Read access to a record store, as needed by rule evaluation.
///
/// Implementations must not cache on behalf of the caller: every call is
/// expected to read the current committed state.
pub trait RecordSource {
    /// Resolve a field name on a record type. `None` when the type has no
    /// such field; never fails otherwise.
    fn schema_field(&self, type_id: TypeId, name: &str) -> Option<SchemaField>;

    /// Human-readable name of a record type, for messages.
    fn type_name(&self, type_id: TypeId) -> Option<String>;

    /// Load the committed snapshot of a record.
    fn load(&self, id: RecordId) -> Option<Record>;

    /// Whether the record has ever been committed.
    fn is_persisted(&self, id: RecordId) -> bool {
        self.load(id).is_some()
    }

    /// Last committed value of a field. `None` when the record was never
    /// persisted; a persisted record with no stored value reads as `Null`
    /// or the schema default.
    fn persisted_value(&self, id: RecordId, field: &str) -> Option<Value>;

    /// Records on the other side of a reverse relation: records of
    /// `field.target` whose `field.remote_field` references `id`.
    fn referencing(&self, id: RecordId, field: &SchemaField) -> Vec<RecordId>;

    /// Fields whose in-memory value differs from the committed snapshot.
    fn changed_fields(&self, record: &Record) -> BTreeSet<String>;
}
