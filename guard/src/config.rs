//! Guard configuration.

use crate::GuardResult;
use latch_rule::UnknownFieldPolicy;
use serde::Deserialize;

/// Default maximum number of segments in a field path.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Settings applied to every evaluation.
///
/// ```json
/// { "max_depth": 8, "unknown_fields": "deny" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardConfig {
    /// Paths with more segments are rejected before evaluation.
    pub max_depth: usize,
    /// Outcome for paths naming a field the record type lacks.
    pub unknown_fields: UnknownFieldPolicy,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            unknown_fields: UnknownFieldPolicy::Permit,
        }
    }
}

impl GuardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    /// Load from JSON. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> GuardResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
