//! Latch Rule
//!
//! Declarative mutability rules and their evaluation.
//!
//! Responsibilities:
//! - Parse and validate `__` separated field paths
//! - Resolve paths through forward and reverse relations
//! - Gate rules with instance and collection predicates
//! - Combine rules with `Or`
//! - Render rule errors from message templates

mod action;
mod error;
mod or;
mod path;
mod predicate;
mod resolver;
mod rule;
pub mod template;
mod violation;

pub use action::Action;
pub use error::{ConfigError, ConfigResult};
pub use or::{Or, RuleCheck, RuleNode, RuleSet};
pub use path::{FieldPath, SEPARATOR};
pub use predicate::{CollectionCondition, Condition};
pub use resolver::{PathResolver, UnknownFieldPolicy};
pub use rule::{MutabilityRule, Satisfaction, Target};
pub use violation::{AggregateViolation, OrViolation, RuleViolation, Violation};
