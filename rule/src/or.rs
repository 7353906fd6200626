//! The `Or` combinator and rule sets.

use crate::error::{ConfigError, ConfigResult};
use crate::{Action, MutabilityRule, OrViolation, RuleViolation, Violation};
use std::collections::BTreeSet;

/// Decides whether a single rule is met, returning its error when not.
pub type RuleCheck<'a> = dyn FnMut(&MutabilityRule) -> Result<(), RuleViolation> + 'a;

/// An entry of a rule set: a rule or a nested disjunction.
#[derive(Debug, Clone)]
pub enum RuleNode {
    Rule(MutabilityRule),
    Or(Or),
}

impl RuleNode {
    /// Evaluate with `met` deciding the leaf rules.
    pub fn evaluate_with(&self, action: Action, met: &mut RuleCheck<'_>) -> Result<(), Violation> {
        match self {
            RuleNode::Rule(rule) => met(rule).map_err(Violation::Rule),
            RuleNode::Or(or) => or.evaluate_with(action, met).map_err(Violation::Or),
        }
    }

    /// Every leaf rule, depth first.
    pub fn rules(&self) -> Vec<&MutabilityRule> {
        match self {
            RuleNode::Rule(rule) => vec![rule],
            RuleNode::Or(or) => or.branches.iter().flat_map(RuleNode::rules).collect(),
        }
    }

    fn check(&self, max_depth: usize) -> ConfigResult<()> {
        self.rules().into_iter().try_for_each(|rule| {
            rule.check()?;
            let depth = rule.path().depth();
            if depth > max_depth {
                return Err(ConfigError::path_too_deep(rule.path().as_str(), depth, max_depth));
            }
            Ok(())
        })
    }
}

impl From<MutabilityRule> for RuleNode {
    fn from(rule: MutabilityRule) -> Self {
        RuleNode::Rule(rule)
    }
}

impl From<Or> for RuleNode {
    fn from(or: Or) -> Self {
        RuleNode::Or(or)
    }
}

/// Logical disjunction over rules and nested `Or`s.
///
/// Evaluation is a pure function of its inputs: the errors of failed
/// branches are returned, never kept on the value, so one `Or` can be
/// shared between concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct Or {
    branches: Vec<RuleNode>,
}

impl Or {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a branch.
    pub fn with(mut self, branch: impl Into<RuleNode>) -> Self {
        self.branches.push(branch.into());
        self
    }

    /// Evaluate branches left to right, stopping at the first satisfied one.
    ///
    /// With no branch satisfied, the error carries one entry per branch. An
    /// `Or` without branches is never satisfied.
    pub fn evaluate_with(&self, action: Action, met: &mut RuleCheck<'_>) -> Result<(), OrViolation> {
        let mut errors = Vec::with_capacity(self.branches.len());
        for branch in &self.branches {
            match branch.evaluate_with(action, met) {
                Ok(()) => return Ok(()),
                Err(error) => errors.push(error),
            }
        }
        Err(OrViolation::new(action, errors))
    }
}

/// Ordered rules attached to a record type.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    nodes: Vec<RuleNode>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule or an `Or`.
    pub fn with(mut self, node: impl Into<RuleNode>) -> Self {
        self.nodes.push(node.into());
        self
    }

    pub fn push(&mut self, node: impl Into<RuleNode>) {
        self.nodes.push(node.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reject malformed rules and paths deeper than `max_depth`.
    pub fn check(&self, max_depth: usize) -> ConfigResult<()> {
        self.nodes.iter().try_for_each(|node| node.check(max_depth))
    }

    /// Fields of a change restricted by some rule of `node`.
    pub fn fields_to_check(node: &RuleNode, changed: &BTreeSet<String>) -> BTreeSet<String> {
        node.rules()
            .into_iter()
            .flat_map(|rule| rule.fields_to_check(changed))
            .collect()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a RuleNode;
    type IntoIter = std::slice::Iter<'a, RuleNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl FromIterator<RuleNode> for RuleSet {
    fn from_iter<I: IntoIterator<Item = RuleNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
