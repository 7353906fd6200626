//! Delete admission.

use super::{check_rule, ActionEvaluator};
use latch_rule::{Action, MutabilityRule, PathResolver, RuleViolation, Target};

/// Checks the record, or records, about to be removed.
pub struct DeleteEvaluator<'a> {
    target: Target<'a>,
    type_name: &'a str,
}

impl<'a> DeleteEvaluator<'a> {
    pub fn new(target: Target<'a>, type_name: &'a str) -> Self {
        Self { target, type_name }
    }
}

impl ActionEvaluator for DeleteEvaluator<'_> {
    fn action(&self) -> Action {
        Action::Delete
    }

    fn is_rule_met(
        &self,
        rule: &MutabilityRule,
        resolver: &PathResolver<'_>,
    ) -> Result<(), RuleViolation> {
        if rule.skips(Action::Delete) {
            return Ok(());
        }
        check_rule(rule, Action::Delete, self.target, self.type_name, resolver)
    }
}
