//! Record selections for bulk operations.

use latch_core::{RecordId, TypeId};

/// A set of records of one type, matched at selection time.
///
/// A selection only holds ids; the records themselves are re-read from the
/// store whenever the selection is evaluated or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    type_id: TypeId,
    ids: Vec<RecordId>,
}

impl Selection {
    pub fn new(type_id: TypeId, mut ids: Vec<RecordId>) -> Self {
        ids.sort();
        ids.dedup();
        Self { type_id, ids }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn ids(&self) -> &[RecordId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
