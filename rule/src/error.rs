//! Rule configuration errors.

use thiserror::Error;

/// Result type for rule configuration checks.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A malformed rule or rule set.
///
/// These are programmer errors in the rule definitions, raised before any
/// rule is evaluated and kept apart from business-rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Field path is empty")]
    EmptyFieldPath,

    #[error("Field path {path:?} contains an empty segment")]
    EmptyPathSegment { path: String },

    #[error("Field path {path:?} contains an invalid segment {segment:?}")]
    InvalidPathSegment { path: String, segment: String },

    #[error("Rule on {path:?} has no accepted values")]
    EmptyAcceptedValues { path: String },

    #[error("Field path {path:?} has {depth} segments, maximum is {max_depth}")]
    PathTooDeep {
        path: String,
        depth: usize,
        max_depth: usize,
    },

    #[error("Batch update requires an explicit, non-empty list of updated fields")]
    MissingUpdateFields,
}

impl ConfigError {
    pub fn empty_path_segment(path: impl Into<String>) -> Self {
        Self::EmptyPathSegment { path: path.into() }
    }

    pub fn invalid_path_segment(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Self::InvalidPathSegment {
            path: path.into(),
            segment: segment.into(),
        }
    }

    pub fn empty_accepted_values(path: impl Into<String>) -> Self {
        Self::EmptyAcceptedValues { path: path.into() }
    }

    pub fn path_too_deep(path: impl Into<String>, depth: usize, max_depth: usize) -> Self {
        Self::PathTooDeep {
            path: path.into(),
            depth,
            max_depth,
        }
    }
}
