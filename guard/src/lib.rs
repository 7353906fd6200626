//! Latch Guard
//!
//! Admission control invoked right before a record store commits.
//!
//! Responsibilities:
//! - Dispatch create, update and delete to their evaluators
//! - Stop at the first violated rule, or aggregate per field for batch updates
//! - Reject malformed rule sets before evaluating anything
//! - Log and honour explicit force overrides
//! - Wrap a `Store` so writes only land after validation

mod config;
mod error;
mod guard;
mod guarded;
pub mod ops;

pub use config::{GuardConfig, DEFAULT_MAX_DEPTH};
pub use error::{GuardError, GuardResult};
pub use guard::{Enforcement, Guard};
pub use guarded::GuardedStore;

pub use latch_rule::{
    Action, AggregateViolation, CollectionCondition, Condition, ConfigError, MutabilityRule, Or,
    OrViolation, RuleSet, RuleViolation, Target, UnknownFieldPolicy, Violation,
};
