//! Schema definition types.

use latch_core::{SchemaField, TypeId, Value};
use std::collections::HashMap;

/// Scalar field definition within a type.
#[derive(Debug, Clone)]
pub struct ScalarDef {
    /// Field name.
    pub name: String,
    /// Value reported for records that were never persisted.
    pub default: Option<Value>,
}

impl ScalarDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// How many records sit on each side of a forward relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cardinality {
    /// Many records may reference the same target (foreign key).
    #[default]
    ManyToOne,
    /// At most one record references a given target.
    OneToOne,
    /// The field holds a list of targets.
    ManyToMany,
}

/// Forward relation definition (held on the declaring type).
#[derive(Debug, Clone)]
pub struct RelationDef {
    /// Field name on the declaring type.
    pub name: String,
    /// Target type name, as declared.
    pub target_name: String,
    /// Target type, resolved at build time.
    pub target: TypeId,
    /// Relation cardinality.
    pub cardinality: Cardinality,
    /// Name of the reverse relation on the target type.
    pub related_name: String,
}

impl RelationDef {
    pub fn is_multi_valued(&self) -> bool {
        matches!(self.cardinality, Cardinality::ManyToMany)
    }
}

/// Reverse relation definition (derived on the target type).
#[derive(Debug, Clone)]
pub struct ReverseDef {
    /// Field name on the target type.
    pub name: String,
    /// Type declaring the forward relation.
    pub source: TypeId,
    /// Forward field on `source` pointing back.
    pub remote_field: String,
    /// False only for the reverse side of a one-to-one relation.
    pub multi_valued: bool,
}

/// Record type definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Unique identifier.
    pub id: TypeId,
    /// Type name.
    pub name: String,
    /// Scalar fields.
    pub scalars: HashMap<String, ScalarDef>,
    /// Forward relations declared on this type.
    pub relations: HashMap<String, RelationDef>,
    /// Reverse relations implied by other types.
    pub reverse: HashMap<String, ReverseDef>,
}

impl TypeDef {
    pub fn new(id: TypeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            scalars: HashMap::new(),
            relations: HashMap::new(),
            reverse: HashMap::new(),
        }
    }

    /// Check if this type has a field of any kind.
    pub fn has_field(&self, name: &str) -> bool {
        self.scalars.contains_key(name)
            || self.relations.contains_key(name)
            || self.reverse.contains_key(name)
    }

    /// Whether the field can be written on a record of this type.
    pub fn is_writable(&self, name: &str) -> bool {
        self.scalars.contains_key(name) || self.relations.contains_key(name)
    }

    /// Resolve a field name to its descriptor.
    pub fn field(&self, name: &str) -> Option<SchemaField> {
        if let Some(scalar) = self.scalars.get(name) {
            let field = SchemaField::scalar(&scalar.name);
            return Some(match &scalar.default {
                Some(default) => field.with_default(default.clone()),
                None => field,
            });
        }
        if let Some(relation) = self.relations.get(name) {
            return Some(SchemaField::forward(
                &relation.name,
                relation.target,
                relation.is_multi_valued(),
            ));
        }
        self.reverse.get(name).map(|reverse| {
            SchemaField::reverse(
                &reverse.name,
                reverse.source,
                &reverse.remote_field,
                reverse.multi_valued,
            )
        })
    }
}
