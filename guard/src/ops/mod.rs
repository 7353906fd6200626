//! Per-action admission protocols.
//!
//! Each action (create, update, delete) decides in its own module which
//! rules are relevant and what they are evaluated against.

mod create;
mod delete;
mod update;

pub use create::CreateEvaluator;
pub use delete::DeleteEvaluator;
pub use update::UpdateEvaluator;

use crate::GuardResult;
use latch_rule::{Action, MutabilityRule, PathResolver, RuleSet, RuleViolation, Target};
use tracing::debug;

/// The admission protocol of one action.
pub trait ActionEvaluator {
    fn action(&self) -> Action;

    /// Decide a single rule.
    fn is_rule_met(
        &self,
        rule: &MutabilityRule,
        resolver: &PathResolver<'_>,
    ) -> Result<(), RuleViolation>;

    /// Evaluate the rule set in order; the first unmet entry aborts.
    fn validate(&self, rules: &RuleSet, resolver: &PathResolver<'_>) -> GuardResult<()> {
        let action = self.action();
        for node in rules {
            node.evaluate_with(action, &mut |rule| self.is_rule_met(rule, resolver))?;
        }
        Ok(())
    }
}

/// Evaluate a relevant rule against its target.
pub(crate) fn check_rule(
    rule: &MutabilityRule,
    action: Action,
    target: Target<'_>,
    type_name: &str,
    resolver: &PathResolver<'_>,
) -> Result<(), RuleViolation> {
    let outcome = rule.is_satisfied(target, resolver);
    debug!(
        rule = %rule.path(),
        action = %action,
        record_type = %type_name,
        satisfied = outcome.satisfied,
        "rule evaluated"
    );
    if outcome.satisfied {
        Ok(())
    } else {
        Err(rule.get_error(action, type_name).with_records(outcome.violating))
    }
}
