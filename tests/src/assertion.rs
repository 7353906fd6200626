//! Assertion types and builders for verifying step outcomes.

use latch_guard::{ConfigError, GuardError, Violation};

use crate::error::{ScenarioError, ScenarioResult};

/// What a step returned: the number of records written, or the guard error.
pub type Outcome = Result<usize, GuardError>;

/// Expected result of a rejected step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A rule or `Or` violation.
    Violation,
    /// A per-field batch violation.
    Aggregate,
    /// A malformed rule set.
    Config,
}

/// A complete assertion for a step outcome.
#[derive(Default)]
pub struct Assertion {
    pub allowed: Option<bool>,
    pub written: Option<usize>,
    pub rejection: Option<Rejection>,
    pub config_error: Option<ConfigError>,

    // Error details
    pub error: Option<String>,
    pub error_pattern: Option<String>,
    pub code: Option<String>,
    pub blocked_fields: Option<Vec<String>>,
    pub or_branches: Option<usize>,

    #[allow(clippy::type_complexity)]
    pub custom: Option<Box<dyn Fn(&Outcome) -> bool + Send + Sync>>,
}

impl std::fmt::Debug for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assertion")
            .field("allowed", &self.allowed)
            .field("written", &self.written)
            .field("rejection", &self.rejection)
            .field("config_error", &self.config_error)
            .field("error", &self.error)
            .field("error_pattern", &self.error_pattern)
            .field("code", &self.code)
            .field("blocked_fields", &self.blocked_fields)
            .field("or_branches", &self.or_branches)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Assertion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify the assertion against an outcome.
    pub fn verify(&self, step: &str, outcome: &Outcome) -> ScenarioResult<()> {
        let fail = |message: String| Err(ScenarioError::assertion_failed(step, message));

        if let Some(expected) = self.allowed {
            match (expected, outcome) {
                (true, Err(e)) => return fail(format!("expected success, got: {}", e)),
                (false, Ok(n)) => {
                    return fail(format!("expected rejection, but {} record(s) were written", n))
                }
                _ => {}
            }
        }

        if let Some(expected) = self.written {
            match outcome {
                Ok(n) if *n == expected => {}
                Ok(n) => return fail(format!("expected {} written, got {}", expected, n)),
                Err(e) => return fail(format!("expected {} written, got error: {}", expected, e)),
            }
        }

        let Err(error) = outcome else {
            return self.verify_custom(step, outcome);
        };

        if let Some(kind) = self.rejection {
            let actual = match error {
                GuardError::Violation(_) => Some(Rejection::Violation),
                GuardError::Aggregate(_) => Some(Rejection::Aggregate),
                GuardError::Config(_) => Some(Rejection::Config),
                _ => None,
            };
            if actual != Some(kind) {
                return fail(format!("expected {:?} rejection, got: {:?}", kind, error));
            }
        }

        if let Some(ref expected) = self.config_error {
            match error {
                GuardError::Config(actual) if actual == expected => {}
                other => return fail(format!("expected config error {:?}, got: {:?}", expected, other)),
            }
        }

        let message = error.to_string();
        if let Some(ref expected) = self.error {
            if !message.contains(expected.as_str()) {
                return fail(format!("expected error containing '{}', got: {}", expected, message));
            }
        }

        if let Some(ref pattern) = self.error_pattern {
            let re = regex_lite::Regex::new(pattern)
                .map_err(|e| ScenarioError::assertion_failed(step, format!("invalid regex pattern: {}", e)))?;
            if !re.is_match(&message) {
                return fail(format!("expected error matching '{}', got: {}", pattern, message));
            }
        }

        if let Some(ref expected) = self.code {
            if error.code() != Some(expected.as_str()) {
                return fail(format!("expected code '{}', got: {:?}", expected, error.code()));
            }
        }

        if let Some(ref expected) = self.blocked_fields {
            let actual: Vec<String> = match error {
                GuardError::Aggregate(aggregate) => aggregate.fields.keys().cloned().collect(),
                other => return fail(format!("expected blocked fields, got: {:?}", other)),
            };
            if &actual != expected {
                return fail(format!("expected blocked fields {:?}, got {:?}", expected, actual));
            }
        }

        if let Some(expected) = self.or_branches {
            match error {
                GuardError::Violation(Violation::Or(or)) if or.errors.len() == expected => {}
                other => {
                    return fail(format!("expected Or violation with {} branch errors, got: {:?}", expected, other))
                }
            }
        }

        self.verify_custom(step, outcome)
    }

    fn verify_custom(&self, step: &str, outcome: &Outcome) -> ScenarioResult<()> {
        match self.custom {
            Some(ref f) if !f(outcome) => Err(ScenarioError::assertion_failed(
                step,
                "custom assertion returned false",
            )),
            _ => Ok(()),
        }
    }
}

/// Builder for assertions.
#[derive(Default)]
pub struct AssertionBuilder {
    assertion: Assertion,
}

impl AssertionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> Assertion {
        self.assertion
    }

    // ==================== Outcome ====================

    /// The step went through.
    pub fn allowed(mut self) -> Self {
        self.assertion.allowed = Some(true);
        self
    }

    /// The step was rejected, for any reason.
    pub fn rejected(mut self) -> Self {
        self.assertion.allowed = Some(false);
        self
    }

    /// The step wrote exactly `n` records.
    pub fn written(mut self, n: usize) -> Self {
        self.assertion.written = Some(n);
        self
    }

    // ==================== Rejections ====================

    /// Rejected by a rule or an `Or`.
    pub fn violation(mut self) -> Self {
        self.assertion.allowed = Some(false);
        self.assertion.rejection = Some(Rejection::Violation);
        self
    }

    /// Rejected by a batch update, with these fields blocked.
    pub fn blocked_fields(mut self, fields: &[&str]) -> Self {
        self.assertion.allowed = Some(false);
        self.assertion.rejection = Some(Rejection::Aggregate);
        self.assertion.blocked_fields = Some(fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Rejected as a malformed rule set.
    pub fn config_error(mut self, expected: ConfigError) -> Self {
        self.assertion.allowed = Some(false);
        self.assertion.rejection = Some(Rejection::Config);
        self.assertion.config_error = Some(expected);
        self
    }

    /// Rejected by an `Or` whose branches all failed.
    pub fn or_failed(mut self, branches: usize) -> Self {
        self.assertion.allowed = Some(false);
        self.assertion.or_branches = Some(branches);
        self
    }

    // ==================== Error details ====================

    pub fn error(mut self, contains: impl Into<String>) -> Self {
        self.assertion.allowed = Some(false);
        self.assertion.error = Some(contains.into());
        self
    }

    pub fn error_matches(mut self, pattern: impl Into<String>) -> Self {
        self.assertion.allowed = Some(false);
        self.assertion.error_pattern = Some(pattern.into());
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.assertion.allowed = Some(false);
        self.assertion.code = Some(code.into());
        self
    }

    pub fn assert_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Outcome) -> bool + Send + Sync + 'static,
    {
        self.assertion.custom = Some(Box::new(f));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latch_guard::{Action, RuleViolation};

    fn violation() -> Outcome {
        let v = RuleViolation::new("state", Action::Update, "Cannot update Base")
            .with_code(Some("LOCKED".into()));
        Err(GuardError::Violation(v.into()))
    }

    #[test]
    fn test_allowed_passes_on_success() {
        let assertion = AssertionBuilder::new().allowed().written(1).build();
        assert!(assertion.verify("step", &Ok(1)).is_ok());
        assert!(assertion.verify("step", &Ok(2)).is_err());
        assert!(assertion.verify("step", &violation()).is_err());
    }

    #[test]
    fn test_violation_details() {
        let assertion = AssertionBuilder::new()
            .violation()
            .code("LOCKED")
            .error("Cannot update")
            .error_matches(r"^Cannot \w+ Base$")
            .build();
        assert!(assertion.verify("step", &violation()).is_ok());
        assert!(assertion.verify("step", &Ok(1)).is_err());
    }

    #[test]
    fn test_wrong_rejection_kind() {
        let assertion = AssertionBuilder::new()
            .config_error(ConfigError::MissingUpdateFields)
            .build();
        assert!(assertion.verify("step", &violation()).is_err());
    }
}
