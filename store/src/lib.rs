//! Latch Store
//!
//! This crate provides the in-memory record store the guard sits in front of:
//! - Committed record snapshots, separate from callers' in-memory records
//! - Draft allocation for records that are not persisted yet
//! - Changed-field diffing between a record and its committed snapshot
//! - Type index: find records by type
//! - Reference index: find records pointing at a record (reverse relations)
//! - Selections: the record collections used by bulk operations

mod index;
mod selection;
mod source;
mod store;

pub use selection::Selection;
pub use store::*;
