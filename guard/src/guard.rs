//! Validation orchestrator.
//!
//! The guard is what a store calls right before committing a create,
//! update or delete. It checks the rule set, then hands it to the evaluator
//! of the attempted action.

use crate::ops::{ActionEvaluator, CreateEvaluator, DeleteEvaluator, UpdateEvaluator};
use crate::{GuardConfig, GuardResult};
use latch_core::{Record, RecordSource};
use latch_rule::{Action, ConfigError, PathResolver, RuleSet, Target};
use std::collections::BTreeSet;
use tracing::info;

/// Whether rules are evaluated for a call.
///
/// There is no default: every call site states which one it wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Evaluate the rule set.
    Enforce,
    /// Skip evaluation. Each forced call is logged.
    Force,
}

impl Enforcement {
    pub fn is_forced(self) -> bool {
        self == Enforcement::Force
    }
}

/// Validates mutations against rule sets.
pub struct Guard<'s> {
    source: &'s dyn RecordSource,
    config: &'s GuardConfig,
}

impl<'s> Guard<'s> {
    pub fn new(source: &'s dyn RecordSource, config: &'s GuardConfig) -> Self {
        Self { source, config }
    }

    /// Validate creating a record that has not been persisted yet.
    pub fn validate_create(
        &self,
        record: &Record,
        rules: &RuleSet,
        enforcement: Enforcement,
    ) -> GuardResult<()> {
        rules.check(self.config.max_depth)?;
        let type_name = self.type_name(record);
        if self.bypassed(Action::Create, &type_name, 1, enforcement) {
            return Ok(());
        }
        CreateEvaluator::new(record, &type_name).validate(rules, &self.resolver())
    }

    /// Validate an update.
    ///
    /// For a single record, `changed_fields` defaults to the fields differing
    /// from the persisted snapshot. A collection needs an explicit, non-empty
    /// field list.
    pub fn validate_update(
        &self,
        target: Target<'_>,
        rules: &RuleSet,
        changed_fields: Option<&BTreeSet<String>>,
        enforcement: Enforcement,
    ) -> GuardResult<()> {
        rules.check(self.config.max_depth)?;
        let Some(first) = target.records().first() else {
            return Ok(());
        };
        let type_name = self.type_name(first);
        if self.bypassed(Action::Update, &type_name, target.records().len(), enforcement) {
            return Ok(());
        }

        let fields = match (target, changed_fields) {
            (Target::Collection(_), None) => return Err(ConfigError::MissingUpdateFields.into()),
            (Target::Collection(_), Some(fields)) if fields.is_empty() => {
                return Err(ConfigError::MissingUpdateFields.into())
            }
            (_, Some(fields)) => fields.clone(),
            (Target::Record(record), None) => self.source.changed_fields(record),
        };

        UpdateEvaluator::new(target, &fields, &type_name).validate(rules, &self.resolver())
    }

    /// Validate deleting a record or a collection.
    pub fn validate_delete(
        &self,
        target: Target<'_>,
        rules: &RuleSet,
        enforcement: Enforcement,
    ) -> GuardResult<()> {
        rules.check(self.config.max_depth)?;
        let Some(first) = target.records().first() else {
            return Ok(());
        };
        let type_name = self.type_name(first);
        if self.bypassed(Action::Delete, &type_name, target.records().len(), enforcement) {
            return Ok(());
        }
        DeleteEvaluator::new(target, &type_name).validate(rules, &self.resolver())
    }

    fn resolver(&self) -> PathResolver<'s> {
        PathResolver::new(self.source, self.config.unknown_fields)
    }

    fn type_name(&self, record: &Record) -> String {
        self.source
            .type_name(record.type_id)
            .unwrap_or_else(|| record.type_id.to_string())
    }

    fn bypassed(
        &self,
        action: Action,
        type_name: &str,
        records: usize,
        enforcement: Enforcement,
    ) -> bool {
        if enforcement.is_forced() {
            info!(
                action = %action,
                record_type = %type_name,
                records,
                "mutability rules bypassed by force"
            );
        }
        enforcement.is_forced()
    }
}
