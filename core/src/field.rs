//! Schema field descriptors.
//!
//! A `SchemaField` is what a field name resolves to on a record type: a
//! scalar, a forward relation held on the record, or a reverse relation
//! implied by other records pointing back at it.

use crate::{TypeId, Value};

/// Kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Plain value stored on the record.
    Scalar,
    /// Reference held by this record (single, or many-to-many list).
    ForwardRelation,
    /// Relation implied by other records referencing this one.
    ReverseRelation,
}

/// Resolved metadata for one field of a record type.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    /// Field name as used in field paths.
    pub name: String,
    /// Scalar, forward or reverse.
    pub kind: FieldKind,
    /// Whether the relation can hold several records.
    pub multi_valued: bool,
    /// Name under which related records are reached.
    pub accessor_name: String,
    /// Related record type, for relations.
    pub target: Option<TypeId>,
    /// For reverse relations: the forward field on `target` that points back.
    pub remote_field: Option<String>,
    /// Value a never-persisted record reports for this field.
    pub default: Option<Value>,
}

impl SchemaField {
    /// A scalar field.
    pub fn scalar(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            accessor_name: name.clone(),
            name,
            kind: FieldKind::Scalar,
            multi_valued: false,
            target: None,
            remote_field: None,
            default: None,
        }
    }

    /// A forward relation to `target`.
    pub fn forward(name: impl Into<String>, target: TypeId, multi_valued: bool) -> Self {
        let name = name.into();
        Self {
            accessor_name: name.clone(),
            name,
            kind: FieldKind::ForwardRelation,
            multi_valued,
            target: Some(target),
            remote_field: None,
            default: None,
        }
    }

    /// A reverse relation: records of `source` whose `remote_field` points here.
    pub fn reverse(
        name: impl Into<String>,
        source: TypeId,
        remote_field: impl Into<String>,
        multi_valued: bool,
    ) -> Self {
        let name = name.into();
        let accessor_name = if multi_valued {
            format!("{}_set", name)
        } else {
            name.clone()
        };
        Self {
            name,
            kind: FieldKind::ReverseRelation,
            multi_valued,
            accessor_name,
            target: Some(source),
            remote_field: Some(remote_field.into()),
            default: None,
        }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn is_relation(&self) -> bool {
        !matches!(self.kind, FieldKind::Scalar)
    }
}
