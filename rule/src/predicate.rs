//! Gating predicates.
//!
//! Predicates are named closures. The name only shows up in `Debug` output and
//! logs; evaluation always goes through the closure.

use latch_core::Record;
use std::fmt;
use std::sync::Arc;

type InstanceFn = dyn Fn(&Record) -> bool + Send + Sync;
type CollectionFn = dyn Fn(&[Record]) -> bool + Send + Sync;

/// A predicate over a single record.
#[derive(Clone)]
pub struct Condition {
    name: String,
    predicate: Arc<InstanceFn>,
}

impl Condition {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate against the in-memory record.
    pub fn holds(&self, record: &Record) -> bool {
        (self.predicate)(record)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Condition({})", self.name)
    }
}

/// A predicate over the whole collection in batch mode.
#[derive(Clone)]
pub struct CollectionCondition {
    name: String,
    predicate: Arc<CollectionFn>,
}

impl CollectionCondition {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&[Record]) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn holds(&self, records: &[Record]) -> bool {
        (self.predicate)(records)
    }
}

impl fmt::Debug for CollectionCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CollectionCondition({})", self.name)
    }
}
