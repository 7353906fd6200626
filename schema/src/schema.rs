//! The Schema - immutable record-type lookup.

use crate::TypeDef;
use latch_core::{SchemaField, TypeId};
use std::collections::HashMap;

/// The Schema provides runtime lookup of record types and their fields.
/// It is immutable after construction.
#[derive(Debug)]
pub struct Schema {
    /// Type definitions by ID.
    types: HashMap<TypeId, TypeDef>,
    /// Type ID lookup by name.
    type_names: HashMap<String, TypeId>,
}

impl Schema {
    /// Create a schema (use SchemaBuilder for construction).
    pub(crate) fn new(types: HashMap<TypeId, TypeDef>, type_names: HashMap<String, TypeId>) -> Self {
        Self { types, type_names }
    }

    // ==================== Type Lookups ====================

    /// Get a type definition by name.
    pub fn get_type_by_name(&self, name: &str) -> Option<&TypeDef> {
        self.type_names.get(name).and_then(|id| self.types.get(id))
    }

    /// Get a type definition by ID.
    pub fn get_type(&self, id: TypeId) -> Option<&TypeDef> {
        self.types.get(&id)
    }

    /// Get a type ID by name.
    pub fn get_type_id(&self, name: &str) -> Option<TypeId> {
        self.type_names.get(name).copied()
    }

    /// Get the number of types.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // ==================== Field Lookups ====================

    /// Resolve a field on a type. Unknown types and unknown fields both
    /// yield `None`.
    pub fn field(&self, type_id: TypeId, name: &str) -> Option<SchemaField> {
        self.types.get(&type_id).and_then(|t| t.field(name))
    }
}
