//! Core record store implementation.

use crate::index::{ReferenceIndex, TypeIndex};
use crate::Selection;
use latch_core::{Fields, Record, RecordId, StoreError, StoreResult, TypeId, Value};
use latch_schema::{Cardinality, Schema, TypeDef};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// ID allocator for records.
#[derive(Debug)]
struct IdAllocator {
    next_record_id: u64,
}

impl IdAllocator {
    fn new() -> Self {
        Self { next_record_id: 1 }
    }

    fn alloc(&mut self) -> RecordId {
        let id = RecordId::new(self.next_record_id);
        self.next_record_id += 1;
        id
    }

    /// Never hand out `id` again.
    fn reserve(&mut self, id: RecordId) {
        self.next_record_id = self.next_record_id.max(id.raw() + 1);
    }
}

/// The in-memory record store.
///
/// The store only holds committed snapshots. Callers work on cloned
/// `Record`s and hand them back through [`Store::commit`].
#[derive(Debug)]
pub struct Store {
    /// Schema the records conform to
    schema: Schema,
    /// Committed snapshots
    records: HashMap<RecordId, Record>,
    /// ID allocator
    id_alloc: IdAllocator,
    /// Type index
    type_index: TypeIndex,
    /// Reverse reference index
    ref_index: ReferenceIndex,
}

impl Store {
    /// Create an empty store for a schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            records: HashMap::new(),
            id_alloc: IdAllocator::new(),
            type_index: TypeIndex::new(),
            ref_index: ReferenceIndex::new(),
        }
    }

    /// The schema this store was built with.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Look up a type id by name.
    pub fn type_id(&self, type_name: &str) -> StoreResult<TypeId> {
        self.schema
            .get_type_id(type_name)
            .ok_or_else(|| StoreError::UnknownType(type_name.to_string()))
    }

    // ==================== Record Operations ====================

    /// Allocate a new, not yet persisted record with scalar defaults applied.
    pub fn draft(&mut self, type_name: &str) -> StoreResult<Record> {
        let type_def = self
            .schema
            .get_type_by_name(type_name)
            .ok_or_else(|| StoreError::UnknownType(type_name.to_string()))?;

        let mut fields = Fields::new();
        for scalar in type_def.scalars.values() {
            if let Some(default) = &scalar.default {
                fields.insert(scalar.name.clone(), default.clone());
            }
        }
        let type_id = type_def.id;

        Ok(Record::new(self.id_alloc.alloc(), type_id, fields))
    }

    /// Create and immediately persist a record.
    pub fn insert(&mut self, type_name: &str, fields: Fields) -> StoreResult<RecordId> {
        let mut record = self.draft(type_name)?;
        record.fields.extend(fields);
        self.commit(&record)?;
        Ok(record.id)
    }

    /// Get the committed snapshot of a record.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// Whether the record has been committed.
    pub fn contains(&self, id: RecordId) -> bool {
        self.records.contains_key(&id)
    }

    /// Write the in-memory record as the new committed snapshot.
    pub fn commit(&mut self, record: &Record) -> StoreResult<()> {
        self.check_record(record)?;
        self.id_alloc.reserve(record.id);

        if let Some(old) = self.records.remove(&record.id) {
            self.unindex(&old);
        }
        self.index(record);
        self.records.insert(record.id, record.clone());

        debug!(record = %record.id, type_id = %record.type_id, "committed record");
        Ok(())
    }

    /// Delete a record. Relations pointing at it are cleared.
    pub fn delete(&mut self, id: RecordId) -> StoreResult<Record> {
        let record = self
            .records
            .remove(&id)
            .ok_or(StoreError::RecordNotFound(id))?;
        self.unindex(&record);

        // Clear references held by other records
        for (source_type, field, source_id) in self.ref_index.all_referencing(id) {
            self.ref_index.remove(id, source_type, &field, source_id);
            if let Some(source) = self.records.get_mut(&source_id) {
                let cleared = match source.value(&field) {
                    Value::List(items) => Value::List(
                        items
                            .into_iter()
                            .filter(|item| item.as_ref_id() != Some(id))
                            .collect(),
                    ),
                    _ => Value::Null,
                };
                source.set(field, cleared);
            }
        }

        debug!(record = %id, "deleted record");
        Ok(record)
    }

    /// Committed value of a field, falling back to the schema default.
    pub fn stored_value(&self, id: RecordId, field: &str) -> Option<Value> {
        let record = self.records.get(&id)?;
        if let Some(value) = record.get(field) {
            return Some(value.clone());
        }
        let default = self
            .schema
            .field(record.type_id, field)
            .and_then(|f| f.default);
        Some(default.unwrap_or(Value::Null))
    }

    /// Fields whose in-memory value differs from the committed snapshot.
    ///
    /// For a record that was never committed, every field it holds counts.
    pub fn diff(&self, record: &Record) -> BTreeSet<String> {
        let Some(stored) = self.records.get(&record.id) else {
            return record.fields.keys().cloned().collect();
        };

        record
            .fields
            .keys()
            .chain(stored.fields.keys())
            .filter(|name| record.value(name) != stored.value(name))
            .cloned()
            .collect()
    }

    /// Ids of records referencing `target` through `source_type.field`.
    pub fn referencing(&self, target: RecordId, source_type: TypeId, field: &str) -> Vec<RecordId> {
        self.ref_index.referencing(target, source_type, field)
    }

    // ==================== Selections ====================

    /// Select the committed records of a type matching a predicate.
    pub fn select<F>(&self, type_name: &str, predicate: F) -> StoreResult<Selection>
    where
        F: Fn(&Record) -> bool,
    {
        let type_id = self.type_id(type_name)?;
        let ids = self
            .type_index
            .get(type_id)
            .filter(|id| self.records.get(id).is_some_and(&predicate))
            .collect();
        Ok(Selection::new(type_id, ids))
    }

    /// Select every committed record of a type.
    pub fn select_all(&self, type_name: &str) -> StoreResult<Selection> {
        self.select(type_name, |_| true)
    }

    /// Current committed snapshots of the records in a selection.
    ///
    /// Records deleted since the selection was made are skipped.
    pub fn fetch(&self, selection: &Selection) -> Vec<Record> {
        selection
            .ids()
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect()
    }

    /// Apply the same field changes to every record in a selection.
    pub fn update_selection(&mut self, selection: &Selection, changes: &Fields) -> StoreResult<usize> {
        let mut records = self.fetch(selection);
        for record in &mut records {
            record.fields.extend(changes.clone());
        }
        self.commit_all(&records)?;
        Ok(records.len())
    }

    /// Commit several records. Every record is checked before any is written.
    pub fn commit_all(&mut self, records: &[Record]) -> StoreResult<()> {
        let mut claimed: HashMap<(TypeId, &str, RecordId), RecordId> = HashMap::new();
        for record in records {
            self.check_record(record)?;
            for (name, target) in self.one_to_one_refs(record) {
                match claimed.insert((record.type_id, name, target), record.id) {
                    Some(holder) if holder != record.id => {
                        return Err(StoreError::target_already_claimed(name, target, holder))
                    }
                    _ => {}
                }
            }
        }
        for record in records {
            self.commit(record)?;
        }
        Ok(())
    }

    /// Get the number of committed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ==================== Internals ====================

    fn check_record(&self, record: &Record) -> StoreResult<()> {
        let type_def = self
            .schema
            .get_type(record.type_id)
            .ok_or(StoreError::TypeNotFound(record.type_id))?;
        for (name, value) in &record.fields {
            self.check_field(type_def, record.id, name, value)?;
        }
        Ok(())
    }

    fn check_field(
        &self,
        type_def: &TypeDef,
        source: RecordId,
        name: &str,
        value: &Value,
    ) -> StoreResult<()> {
        if type_def.scalars.contains_key(name) {
            return Ok(());
        }
        if type_def.reverse.contains_key(name) {
            return Err(StoreError::reverse_relation_write(&type_def.name, name));
        }
        let relation = type_def
            .relations
            .get(name)
            .ok_or_else(|| StoreError::unknown_field(&type_def.name, name))?;

        let targets = match (relation.cardinality, value) {
            (_, Value::Null) => return Ok(()),
            (Cardinality::ManyToMany, Value::List(_)) => value.ref_ids(),
            (Cardinality::ManyToOne | Cardinality::OneToOne, Value::Ref(id)) => vec![*id],
            (Cardinality::ManyToMany, other) => {
                return Err(StoreError::type_mismatch(name, "List", other.type_name()))
            }
            (_, other) => return Err(StoreError::type_mismatch(name, "Ref", other.type_name())),
        };

        for target in targets {
            let target_record = self
                .records
                .get(&target)
                .ok_or_else(|| StoreError::dangling_reference(name, target))?;
            if target_record.type_id != relation.target {
                let actual = self
                    .schema
                    .get_type(target_record.type_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| target_record.type_id.to_string());
                return Err(StoreError::type_mismatch(name, &relation.target_name, actual));
            }
            if relation.cardinality == Cardinality::OneToOne {
                let holder = self
                    .ref_index
                    .referencing(target, type_def.id, name)
                    .into_iter()
                    .find(|holder| *holder != source);
                if let Some(holder) = holder {
                    return Err(StoreError::target_already_claimed(name, target, holder));
                }
            }
        }
        Ok(())
    }

    /// One-to-one references set on a record, by field.
    fn one_to_one_refs<'r>(&self, record: &'r Record) -> Vec<(&'r str, RecordId)> {
        let Some(type_def) = self.schema.get_type(record.type_id) else {
            return Vec::new();
        };
        record
            .fields
            .iter()
            .filter(|(name, _)| {
                type_def
                    .relations
                    .get(name.as_str())
                    .is_some_and(|r| r.cardinality == Cardinality::OneToOne)
            })
            .filter_map(|(name, value)| value.as_ref_id().map(|id| (name.as_str(), id)))
            .collect()
    }

    fn outbound_refs(&self, record: &Record) -> Vec<(String, RecordId)> {
        let Some(type_def) = self.schema.get_type(record.type_id) else {
            return Vec::new();
        };
        type_def
            .relations
            .keys()
            .flat_map(|name| {
                record
                    .get(name)
                    .map(Value::ref_ids)
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |target| (name.clone(), target))
            })
            .collect()
    }

    fn index(&mut self, record: &Record) {
        self.type_index.insert(record.type_id, record.id);
        for (field, target) in self.outbound_refs(record) {
            self.ref_index.insert(target, record.type_id, &field, record.id);
        }
    }

    fn unindex(&mut self, record: &Record) {
        self.type_index.remove(record.type_id, record.id);
        for (field, target) in self.outbound_refs(record) {
            self.ref_index.remove(target, record.type_id, &field, record.id);
        }
    }
}
