//! Mutability rules.

use crate::error::{ConfigError, ConfigResult};
use crate::template::{self, MessageContext, DEFAULT_TEMPLATE};
use crate::{Action, CollectionCondition, Condition, FieldPath, PathResolver, RuleViolation};
use latch_core::{Record, RecordId, Value};
use std::collections::BTreeSet;

/// What a rule is evaluated against.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    /// A single record.
    Record(&'a Record),
    /// Every record of a batch operation.
    Collection(&'a [Record]),
}

impl<'a> Target<'a> {
    pub fn records(&self) -> &'a [Record] {
        match self {
            Target::Record(record) => std::slice::from_ref(*record),
            Target::Collection(records) => records,
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Target::Collection(_))
    }
}

/// Outcome of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Satisfaction {
    pub satisfied: bool,
    /// Records that failed the check, in evaluation order.
    pub violating: Vec<RecordId>,
}

impl Satisfaction {
    pub fn met() -> Self {
        Self {
            satisfied: true,
            violating: Vec::new(),
        }
    }

    pub fn from_violating(violating: Vec<RecordId>) -> Self {
        Self {
            satisfied: violating.is_empty(),
            violating,
        }
    }
}

/// A rule making records immutable unless the value at the end of
/// `path` is one of the accepted values.
///
/// ```text
/// // only the note may change once an invoice leaves draft
/// MutabilityRule::new("state", ["draft"]).exclude_fields(["note"])
/// // lines are locked, and cannot be added, once the invoice is not draft
/// MutabilityRule::new("invoice__state", ["draft"]).skip_on_create(false)
/// ```
#[derive(Debug, Clone)]
pub struct MutabilityRule {
    path: FieldPath,
    accepted: Vec<Value>,
    excluded_fields: BTreeSet<String>,
    skip_on_create: bool,
    skip_on_update: bool,
    skip_on_delete: bool,
    instance_conditions: Vec<Condition>,
    instance_exclusion_conditions: Vec<Condition>,
    collection_conditions: Vec<CollectionCondition>,
    collection_exclusion_conditions: Vec<CollectionCondition>,
    error_message: Option<String>,
    error_code: Option<String>,
}

impl MutabilityRule {
    /// Creation is unrestricted unless `skip_on_create(false)` is set.
    pub fn new<I, V>(path: impl Into<String>, accepted: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            path: FieldPath::new(path),
            accepted: accepted.into_iter().map(Into::into).collect(),
            excluded_fields: BTreeSet::new(),
            skip_on_create: true,
            skip_on_update: false,
            skip_on_delete: false,
            instance_conditions: Vec::new(),
            instance_exclusion_conditions: Vec::new(),
            collection_conditions: Vec::new(),
            collection_exclusion_conditions: Vec::new(),
            error_message: None,
            error_code: None,
        }
    }

    // ==================== Builder ====================

    /// Fields that stay writable while the record is immutable.
    pub fn exclude_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn skip_on_create(mut self, skip: bool) -> Self {
        self.skip_on_create = skip;
        self
    }

    pub fn skip_on_update(mut self, skip: bool) -> Self {
        self.skip_on_update = skip;
        self
    }

    pub fn skip_on_delete(mut self, skip: bool) -> Self {
        self.skip_on_delete = skip;
        self
    }

    /// The rule only applies to records for which every condition holds.
    pub fn when(mut self, condition: Condition) -> Self {
        self.instance_conditions.push(condition);
        self
    }

    /// The rule is bypassed for records for which any of these holds.
    pub fn unless(mut self, condition: Condition) -> Self {
        self.instance_exclusion_conditions.push(condition);
        self
    }

    pub fn when_collection(mut self, condition: CollectionCondition) -> Self {
        self.collection_conditions.push(condition);
        self
    }

    pub fn unless_collection(mut self, condition: CollectionCondition) -> Self {
        self.collection_exclusion_conditions.push(condition);
        self
    }

    pub fn error_message(mut self, template: impl Into<String>) -> Self {
        self.error_message = Some(template.into());
        self
    }

    pub fn error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    // ==================== Accessors ====================

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn accepted_values(&self) -> &[Value] {
        &self.accepted
    }

    pub fn excluded_fields(&self) -> &BTreeSet<String> {
        &self.excluded_fields
    }

    /// Whether the rule is switched off for an action.
    pub fn skips(&self, action: Action) -> bool {
        match action {
            Action::Create => self.skip_on_create,
            Action::Update => self.skip_on_update,
            Action::Delete => self.skip_on_delete,
        }
    }

    // ==================== Checks ====================

    /// Reject malformed rules.
    pub fn check(&self) -> ConfigResult<()> {
        self.path.validate()?;
        if self.accepted.is_empty() {
            return Err(ConfigError::empty_accepted_values(self.path.as_str()));
        }
        Ok(())
    }

    /// Changed fields this rule restricts.
    ///
    /// The rule's own field is dropped when the path stays on the record, so
    /// switching the state back to an accepted value is always possible.
    pub fn fields_to_check(&self, changed: &BTreeSet<String>) -> BTreeSet<String> {
        let own = self.path.is_local().then(|| self.path.as_str());
        changed
            .iter()
            .filter(|f| !self.excluded_fields.contains(*f))
            .filter(|f| Some(f.as_str()) != own)
            .cloned()
            .collect()
    }

    /// Gating for a single record: all conditions hold and no exclusion does.
    pub fn applies_to(&self, record: &Record) -> bool {
        self.instance_conditions.iter().all(|c| c.holds(record))
            && !self.instance_exclusion_conditions.iter().any(|c| c.holds(record))
    }

    /// Gating for a whole batch.
    pub fn applies_to_collection(&self, records: &[Record]) -> bool {
        self.collection_conditions.iter().all(|c| c.holds(records))
            && !self
                .collection_exclusion_conditions
                .iter()
                .any(|c| c.holds(records))
    }

    /// Evaluate gating, then resolve the path on every record it applies to.
    pub fn is_satisfied(&self, target: Target<'_>, resolver: &PathResolver<'_>) -> Satisfaction {
        let candidates: Vec<&Record> = match target {
            Target::Record(record) => {
                if !self.applies_to(record) {
                    return Satisfaction::met();
                }
                vec![record]
            }
            Target::Collection(records) => {
                if !self.applies_to_collection(records) {
                    return Satisfaction::met();
                }
                records.iter().filter(|r| self.applies_to(r)).collect()
            }
        };

        let violating = candidates
            .into_iter()
            .filter(|r| !resolver.resolve(r, self.path.segments(), &self.accepted))
            .map(|r| r.id)
            .collect();
        Satisfaction::from_violating(violating)
    }

    /// Render the rule's error for an action.
    pub fn get_error(&self, action: Action, type_name: &str) -> RuleViolation {
        let template = self.error_message.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let message = template::render(
            template,
            &MessageContext {
                action: action.as_str(),
                field: self.path.as_str(),
                values: &self.accepted,
                type_name,
            },
        );
        RuleViolation::new(self.path.as_str(), action, message).with_code(self.error_code.clone())
    }
}
