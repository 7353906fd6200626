//! Common error types for latch stores.

use crate::{RecordId, TypeId};
use thiserror::Error;

/// Errors that can occur during record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found.
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    /// Record type not found by id.
    #[error("Type not found: {0}")]
    TypeNotFound(TypeId),

    /// Record type not found by name.
    #[error("Unknown type: {0}")]
    UnknownType(String),

    /// Field does not exist on the record type.
    #[error("Unknown field: {field} on type {type_name}")]
    UnknownField { type_name: String, field: String },

    /// Reverse relations are derived and cannot be written.
    #[error("Cannot write reverse relation {field} on type {type_name}")]
    ReverseRelationWrite { type_name: String, field: String },

    /// A relation points at a record that does not exist.
    #[error("Dangling reference: {field} -> {target}")]
    DanglingReference { field: String, target: RecordId },

    /// A relation points at a record of the wrong type.
    #[error("Type mismatch for {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    /// A one-to-one target is already referenced by another record.
    #[error("{target} is already referenced through {field} by {holder}")]
    TargetAlreadyClaimed {
        field: String,
        target: RecordId,
        holder: RecordId,
    },
}

impl StoreError {
    pub fn unknown_field(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn reverse_relation_write(type_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ReverseRelationWrite {
            type_name: type_name.into(),
            field: field.into(),
        }
    }

    pub fn dangling_reference(field: impl Into<String>, target: RecordId) -> Self {
        Self::DanglingReference {
            field: field.into(),
            target,
        }
    }

    pub fn type_mismatch(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl StoreError {
    pub fn target_already_claimed(field: impl Into<String>, target: RecordId, holder: RecordId) -> Self {
        Self::TargetAlreadyClaimed {
            field: field.into(),
            target,
            holder,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
