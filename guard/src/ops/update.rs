//! Update admission.

use super::{check_rule, ActionEvaluator};
use crate::GuardResult;
use latch_rule::{
    Action, AggregateViolation, MutabilityRule, PathResolver, RuleSet, RuleViolation, Target,
};
use std::collections::BTreeSet;
use tracing::debug;

/// Checks a change to one record, or the same change to a batch.
///
/// A rule only matters when the change touches a field it restricts: its
/// excluded fields, and its own field for paths that stay on the record, do
/// not count. In batch mode every entry is evaluated and failures are
/// reported per blocked field.
pub struct UpdateEvaluator<'a> {
    target: Target<'a>,
    fields: &'a BTreeSet<String>,
    type_name: &'a str,
}

impl<'a> UpdateEvaluator<'a> {
    pub fn new(target: Target<'a>, fields: &'a BTreeSet<String>, type_name: &'a str) -> Self {
        Self {
            target,
            fields,
            type_name,
        }
    }

    fn validate_collection(&self, rules: &RuleSet, resolver: &PathResolver<'_>) -> GuardResult<()> {
        let mut aggregate = AggregateViolation::new(Action::Update);
        for node in rules {
            if let Err(violation) =
                node.evaluate_with(Action::Update, &mut |rule| self.is_rule_met(rule, resolver))
            {
                for field in RuleSet::fields_to_check(node, self.fields) {
                    aggregate.push(field, violation.clone());
                }
            }
        }
        if aggregate.is_empty() {
            Ok(())
        } else {
            Err(aggregate.into())
        }
    }
}

impl ActionEvaluator for UpdateEvaluator<'_> {
    fn action(&self) -> Action {
        Action::Update
    }

    fn is_rule_met(
        &self,
        rule: &MutabilityRule,
        resolver: &PathResolver<'_>,
    ) -> Result<(), RuleViolation> {
        if rule.skips(Action::Update) {
            return Ok(());
        }
        let to_check = rule.fields_to_check(self.fields);
        if to_check.is_empty() {
            debug!(rule = %rule.path(), "no restricted field changed");
            return Ok(());
        }
        check_rule(rule, Action::Update, self.target, self.type_name, resolver)
    }

    fn validate(&self, rules: &RuleSet, resolver: &PathResolver<'_>) -> GuardResult<()> {
        if self.target.is_collection() {
            return self.validate_collection(rules, resolver);
        }
        for node in rules {
            node.evaluate_with(Action::Update, &mut |rule| self.is_rule_met(rule, resolver))?;
        }
        Ok(())
    }
}
