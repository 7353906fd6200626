//! Create admission.

use super::{check_rule, ActionEvaluator};
use latch_core::Record;
use latch_rule::{Action, MutabilityRule, PathResolver, RuleViolation, Target};

/// Checks a record that has not been persisted yet.
///
/// Rules are skipped on create unless they opt in, and scalar lookups fall
/// back to schema defaults.
pub struct CreateEvaluator<'a> {
    record: &'a Record,
    type_name: &'a str,
}

impl<'a> CreateEvaluator<'a> {
    pub fn new(record: &'a Record, type_name: &'a str) -> Self {
        Self { record, type_name }
    }
}

impl ActionEvaluator for CreateEvaluator<'_> {
    fn action(&self) -> Action {
        Action::Create
    }

    fn is_rule_met(
        &self,
        rule: &MutabilityRule,
        resolver: &PathResolver<'_>,
    ) -> Result<(), RuleViolation> {
        if rule.skips(Action::Create) {
            return Ok(());
        }
        check_rule(
            rule,
            Action::Create,
            Target::Record(self.record),
            self.type_name,
            resolver,
        )
    }
}
