//! SchemaBuilder for constructing an immutable Schema.

use crate::{Cardinality, RelationDef, ReverseDef, ScalarDef, Schema, TypeDef};
use latch_core::{TypeId, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during schema construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Duplicate type name: {0}")]
    DuplicateTypeName(String),

    #[error("Duplicate field {field} on type {type_name}")]
    DuplicateField { type_name: String, field: String },

    #[error("Unknown relation target {target} for {type_name}.{field}")]
    UnknownRelationTarget {
        type_name: String,
        field: String,
        target: String,
    },

    #[error("Reverse relation {name} clashes with an existing field on type {type_name}")]
    ReverseNameClash { type_name: String, name: String },
}

impl SchemaError {
    pub fn duplicate_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn reverse_name_clash(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ReverseNameClash {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

/// A forward relation whose target has not been resolved yet.
#[derive(Debug, Clone)]
struct PendingRelation {
    name: String,
    target_name: String,
    cardinality: Cardinality,
    related_name: Option<String>,
}

/// Builder for constructing an immutable Schema.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    /// Next type ID to allocate.
    next_type_id: u32,
    /// Types being built.
    types: HashMap<TypeId, TypeDef>,
    /// Type name to ID mapping.
    type_names: HashMap<String, TypeId>,
    /// Relations waiting for their target to be resolved.
    pending: Vec<(TypeId, PendingRelation)>,
}

impl SchemaBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record type definition.
    pub fn add_type(&mut self, name: impl Into<String>) -> TypeBuilder<'_> {
        let name = name.into();
        let id = TypeId::new(self.next_type_id);
        self.next_type_id += 1;

        TypeBuilder {
            builder: self,
            id,
            name,
            scalars: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Build the immutable Schema.
    ///
    /// Relation targets are resolved here, so a type may relate to a type
    /// declared after it (or to itself).
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut types = self.types;
        let mut reverse = Vec::with_capacity(self.pending.len());

        // Forward relations first, so reverse names are checked against all of them
        for (source_id, pending) in self.pending {
            let source_name = types
                .get(&source_id)
                .map(|t| t.name.clone())
                .unwrap_or_default();

            let target_id = *self.type_names.get(&pending.target_name).ok_or_else(|| {
                SchemaError::UnknownRelationTarget {
                    type_name: source_name.clone(),
                    field: pending.name.clone(),
                    target: pending.target_name.clone(),
                }
            })?;

            let related_name = pending
                .related_name
                .unwrap_or_else(|| source_name.to_lowercase());

            reverse.push((
                target_id,
                ReverseDef {
                    name: related_name.clone(),
                    source: source_id,
                    remote_field: pending.name.clone(),
                    multi_valued: !matches!(pending.cardinality, Cardinality::OneToOne),
                },
            ));

            if let Some(source) = types.get_mut(&source_id) {
                source.relations.insert(
                    pending.name.clone(),
                    RelationDef {
                        name: pending.name,
                        target_name: pending.target_name,
                        target: target_id,
                        cardinality: pending.cardinality,
                        related_name,
                    },
                );
            }
        }

        for (target_id, def) in reverse {
            let Some(target) = types.get_mut(&target_id) else {
                continue;
            };
            if target.has_field(&def.name) {
                return Err(SchemaError::reverse_name_clash(&target.name, def.name));
            }
            target.reverse.insert(def.name.clone(), def);
        }

        Ok(Schema::new(types, self.type_names))
    }
}

/// Builder for a type definition.
pub struct TypeBuilder<'a> {
    builder: &'a mut SchemaBuilder,
    id: TypeId,
    name: String,
    scalars: Vec<ScalarDef>,
    relations: Vec<PendingRelation>,
}

impl<'a> TypeBuilder<'a> {
    /// Add a scalar field.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.scalars.push(ScalarDef::new(name));
        self
    }

    /// Add a scalar field with a default value.
    pub fn field_with_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.scalars.push(ScalarDef::new(name).with_default(default));
        self
    }

    /// Add a nullable foreign-key style relation.
    pub fn relation(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.push_relation(name, target, Cardinality::ManyToOne)
    }

    /// Add a one-to-one relation.
    pub fn one_to_one(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.push_relation(name, target, Cardinality::OneToOne)
    }

    /// Add a many-to-many relation.
    pub fn many_to_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.push_relation(name, target, Cardinality::ManyToMany)
    }

    /// Name the reverse side of the most recently added relation.
    pub fn related_name(mut self, related_name: impl Into<String>) -> Self {
        if let Some(relation) = self.relations.last_mut() {
            relation.related_name = Some(related_name.into());
        }
        self
    }

    fn push_relation(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        self.relations.push(PendingRelation {
            name: name.into(),
            target_name: target.into(),
            cardinality,
            related_name: None,
        });
        self
    }

    /// Finish building this type.
    pub fn done(self) -> Result<TypeId, SchemaError> {
        // Check for duplicate name
        if self.builder.type_names.contains_key(&self.name) {
            return Err(SchemaError::DuplicateTypeName(self.name));
        }

        let mut type_def = TypeDef::new(self.id, self.name.clone());
        for scalar in self.scalars {
            if type_def.has_field(&scalar.name) {
                return Err(SchemaError::duplicate_field(&self.name, scalar.name));
            }
            type_def.scalars.insert(scalar.name.clone(), scalar);
        }

        let mut relation_names = Vec::with_capacity(self.relations.len());
        for relation in &self.relations {
            if type_def.has_field(&relation.name) || relation_names.contains(&relation.name) {
                return Err(SchemaError::duplicate_field(&self.name, &relation.name));
            }
            relation_names.push(relation.name.clone());
        }

        self.builder.type_names.insert(self.name, self.id);
        self.builder.types.insert(self.id, type_def);
        self.builder
            .pending
            .extend(self.relations.into_iter().map(|r| (self.id, r)));

        Ok(self.id)
    }
}
