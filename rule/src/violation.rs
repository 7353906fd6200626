//! Rule violation types.

use crate::Action;
use latch_core::RecordId;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// A single rule whose constraint is not met for the attempted action.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct RuleViolation {
    /// Field path of the violated rule.
    pub rule: String,
    /// The attempted action.
    pub action: Action,
    /// Rendered message.
    pub message: String,
    /// Machine-readable code, when the rule defines one.
    pub code: Option<String>,
    /// Records that failed the check.
    pub records: Vec<RecordId>,
}

impl RuleViolation {
    pub fn new(rule: impl Into<String>, action: Action, message: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            action,
            message: message.into(),
            code: None,
            records: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    pub fn with_records(mut self, records: Vec<RecordId>) -> Self {
        self.records = records;
        self
    }
}

/// Every branch of an `Or` failed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrViolation {
    pub action: Action,
    /// One error per failed branch, in branch order.
    pub errors: Vec<Violation>,
}

impl OrViolation {
    pub fn new(action: Action, errors: Vec<Violation>) -> Self {
        Self { action, errors }
    }
}

impl fmt::Display for OrViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return write!(f, "Cannot {}: no alternative allows it", self.action);
        }
        write!(f, "Cannot {}, every alternative failed: ", self.action)?;
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for OrViolation {}

/// The error of one rule-set entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error(transparent)]
    Rule(RuleViolation),

    #[error(transparent)]
    Or(OrViolation),
}

impl Violation {
    /// Code of the violated rule. `Or` violations carry none of their own.
    pub fn code(&self) -> Option<&str> {
        match self {
            Violation::Rule(v) => v.code.as_deref(),
            Violation::Or(_) => None,
        }
    }
}

impl From<RuleViolation> for Violation {
    fn from(v: RuleViolation) -> Self {
        Violation::Rule(v)
    }
}

impl From<OrViolation> for Violation {
    fn from(v: OrViolation) -> Self {
        Violation::Or(v)
    }
}

/// Batch update failures, grouped by the field they block.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateViolation {
    pub action: Action,
    pub fields: BTreeMap<String, Vec<Violation>>,
}

impl AggregateViolation {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            fields: BTreeMap::new(),
        }
    }

    /// Record that `violation` blocks changing `field`.
    pub fn push(&mut self, field: impl Into<String>, violation: Violation) {
        self.fields.entry(field.into()).or_default().push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Errors blocking one field.
    pub fn errors_for(&self, field: &str) -> &[Violation] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }
}

impl fmt::Display for AggregateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cannot {}", self.action)?;
        for (i, (field, errors)) in self.fields.iter().enumerate() {
            write!(f, "{}{}: ", if i == 0 { " " } else { "; " }, field)?;
            for (j, error) in errors.iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", error)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for AggregateViolation {}
