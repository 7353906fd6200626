//! Latch Core Types
//!
//! This crate provides the foundational types shared by every latch crate:
//! - Identity types (RecordId, TypeId)
//! - Value types (the Value enum with scalar and reference variants)
//! - Records (the in-memory snapshot of a stored entity)
//! - Schema field descriptors (what a field name resolves to)
//! - The `RecordSource` seam through which rules read the backing store
//! - Common store error types

mod error;
mod field;
mod id;
mod record;
mod source;
mod value;

pub use error::*;
pub use field::*;
pub use id::*;
pub use record::*;
pub use source::*;
pub use value::*;
