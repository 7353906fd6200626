//! Indexes for efficient record lookups.

use latch_core::{RecordId, TypeId};
use std::collections::{BTreeSet, HashMap};

/// Type index: TypeId -> Set<RecordId>
#[derive(Debug, Default)]
pub struct TypeIndex {
    index: HashMap<TypeId, BTreeSet<RecordId>>,
}

impl TypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_id: TypeId, record_id: RecordId) {
        self.index.entry(type_id).or_default().insert(record_id);
    }

    pub fn remove(&mut self, type_id: TypeId, record_id: RecordId) {
        if let Some(set) = self.index.get_mut(&type_id) {
            set.remove(&record_id);
            if set.is_empty() {
                self.index.remove(&type_id);
            }
        }
    }

    /// Records of a type, in id order.
    pub fn get(&self, type_id: TypeId) -> impl Iterator<Item = RecordId> + '_ {
        self.index
            .get(&type_id)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// Key identifying one forward relation: (declaring type, field name).
type RelationKey = (TypeId, String);

/// Reference index: target -> (source type, field) -> sources.
///
/// Answers "which records of type T reference this record through field F",
/// which is exactly what a reverse relation needs.
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    inbound: HashMap<RecordId, HashMap<RelationKey, BTreeSet<RecordId>>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: RecordId, source_type: TypeId, field: &str, source: RecordId) {
        self.inbound
            .entry(target)
            .or_default()
            .entry((source_type, field.to_string()))
            .or_default()
            .insert(source);
    }

    pub fn remove(&mut self, target: RecordId, source_type: TypeId, field: &str, source: RecordId) {
        if let Some(by_relation) = self.inbound.get_mut(&target) {
            let key = (source_type, field.to_string());
            if let Some(set) = by_relation.get_mut(&key) {
                set.remove(&source);
                if set.is_empty() {
                    by_relation.remove(&key);
                }
            }
            if by_relation.is_empty() {
                self.inbound.remove(&target);
            }
        }
    }

    /// Sources referencing `target` through `source_type.field`, in id order.
    pub fn referencing(&self, target: RecordId, source_type: TypeId, field: &str) -> Vec<RecordId> {
        self.inbound
            .get(&target)
            .and_then(|by_relation| by_relation.get(&(source_type, field.to_string())))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Every (source type, field, source) pointing at `target`.
    pub fn all_referencing(&self, target: RecordId) -> Vec<(TypeId, String, RecordId)> {
        self.inbound
            .get(&target)
            .into_iter()
            .flat_map(|by_relation| {
                by_relation.iter().flat_map(|((type_id, field), sources)| {
                    sources.iter().map(move |s| (*type_id, field.clone(), *s))
                })
            })
            .collect()
    }
}
