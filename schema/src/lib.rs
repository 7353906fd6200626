//! Latch Schema
//!
//! Runtime schema lookup. Single source of truth for record types, their
//! scalar fields and the relations between them.
//! The schema is immutable after construction via SchemaBuilder; reverse
//! relations are derived from forward ones when it is built.

mod builder;
mod schema;
mod types;

pub use builder::{SchemaBuilder, SchemaError, TypeBuilder};
pub use schema::Schema;
pub use types::*;
