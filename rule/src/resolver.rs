//! Field-path resolution.
//!
//! Walks a field path from a record through forward and reverse relations
//! and decides whether the value at the end is one of the accepted values.
//! Every relation hop is a fresh read through the `RecordSource`.

use latch_core::{FieldKind, Record, RecordId, RecordSource, SchemaField, Value};
use serde::Deserialize;
use tracing::{debug, warn};

/// What to do when a path names a field the record type does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFieldPolicy {
    /// Treat the record as mutable.
    #[default]
    Permit,
    /// Treat the record as immutable.
    Deny,
}

/// Resolves field paths against a record source.
pub struct PathResolver<'s> {
    source: &'s dyn RecordSource,
    unknown_fields: UnknownFieldPolicy,
}

impl<'s> PathResolver<'s> {
    pub fn new(source: &'s dyn RecordSource, unknown_fields: UnknownFieldPolicy) -> Self {
        Self {
            source,
            unknown_fields,
        }
    }

    /// Whether `record` is mutable according to `path` and `accepted`.
    pub fn resolve(&self, record: &Record, path: &[String], accepted: &[Value]) -> bool {
        let Some((head, rest)) = path.split_first() else {
            return true;
        };

        let Some(field) = self.source.schema_field(record.type_id, head) else {
            let type_name = self
                .source
                .type_name(record.type_id)
                .unwrap_or_else(|| record.type_id.to_string());
            warn!(
                field = %head,
                record_type = %type_name,
                policy = ?self.unknown_fields,
                "field does not exist"
            );
            return self.unknown_fields == UnknownFieldPolicy::Permit;
        };

        match field.kind {
            FieldKind::Scalar => {
                if !rest.is_empty() {
                    warn!(field = %head, "scalar field in the middle of a path, remaining segments ignored");
                }
                let value = self.persisted_scalar(record, &field);
                accepted.contains(&value)
            }
            FieldKind::ForwardRelation => {
                let reference = self.forward_reference(record, head);
                if rest.is_empty() {
                    return accepted.contains(&reference);
                }
                let related = reference.ref_ids();
                debug!(field = %head, related = related.len(), "following forward relation");
                self.resolve_related(&related, rest, accepted)
            }
            FieldKind::ReverseRelation => {
                let related = self.reverse_related(record, &field);
                if rest.is_empty() {
                    return accepted.contains(&Self::reverse_value(&field, &related));
                }
                debug!(field = %field.accessor_name, related = related.len(), "following reverse relation");
                self.resolve_related(&related, rest, accepted)
            }
        }
    }

    /// Every related record must resolve; none at all is vacuously true.
    fn resolve_related(&self, related: &[RecordId], rest: &[String], accepted: &[Value]) -> bool {
        related.iter().all(|id| match self.source.load(*id) {
            Some(record) => self.resolve(&record, rest, accepted),
            None => true,
        })
    }

    /// Committed value, or the schema default for a record never persisted.
    fn persisted_scalar(&self, record: &Record, field: &SchemaField) -> Value {
        self.source
            .persisted_value(record.id, &field.name)
            .unwrap_or_else(|| field.default.clone().unwrap_or(Value::Null))
    }

    /// Committed reference, or the pending one for a record never persisted.
    fn forward_reference(&self, record: &Record, name: &str) -> Value {
        self.source
            .persisted_value(record.id, name)
            .unwrap_or_else(|| record.value(name))
    }

    fn reverse_related(&self, record: &Record, field: &SchemaField) -> Vec<RecordId> {
        if !self.source.is_persisted(record.id) {
            return Vec::new();
        }
        self.source.referencing(record.id, field)
    }

    fn reverse_value(field: &SchemaField, related: &[RecordId]) -> Value {
        if field.multi_valued {
            Value::from(related.to_vec())
        } else {
            related.first().copied().into()
        }
    }
}
