//! A store that validates every write against the rules of its record type.

use crate::{Enforcement, Guard, GuardConfig, GuardResult};
use latch_core::{Fields, Record, RecordId, StoreError, TypeId};
use latch_rule::{RuleSet, Target};
use latch_store::{Selection, Store};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Commit guard around a [`Store`].
///
/// Writes only reach the store after validation passed.
#[derive(Debug)]
pub struct GuardedStore {
    store: Store,
    rules: HashMap<TypeId, RuleSet>,
    config: GuardConfig,
    /// Returned for types without rules.
    no_rules: RuleSet,
}

impl GuardedStore {
    pub fn new(store: Store) -> Self {
        Self::with_config(store, GuardConfig::default())
    }

    pub fn with_config(store: Store, config: GuardConfig) -> Self {
        Self {
            store,
            rules: HashMap::new(),
            config,
            no_rules: RuleSet::new(),
        }
    }

    /// Attach a rule set to a record type, replacing any previous one.
    ///
    /// The rule set is checked here so malformed rules fail at setup.
    pub fn register_rules(&mut self, type_name: &str, rules: RuleSet) -> GuardResult<()> {
        let type_id = self.store.type_id(type_name)?;
        rules.check(self.config.max_depth)?;
        debug!(record_type = %type_name, rules = rules.len(), "registered mutability rules");
        self.rules.insert(type_id, rules);
        Ok(())
    }

    pub fn rules_for(&self, type_id: TypeId) -> &RuleSet {
        self.rules.get(&type_id).unwrap_or(&self.no_rules)
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.store.get(id)
    }

    /// Allocate a record to be passed to [`GuardedStore::save`].
    pub fn draft(&mut self, type_name: &str) -> GuardResult<Record> {
        Ok(self.store.draft(type_name)?)
    }

    pub fn select<F>(&self, type_name: &str, predicate: F) -> GuardResult<Selection>
    where
        F: Fn(&Record) -> bool,
    {
        Ok(self.store.select(type_name, predicate)?)
    }

    // ==================== Guarded Writes ====================

    /// Persist a record: a create for a draft, an update otherwise.
    pub fn save(&mut self, record: &Record, enforcement: Enforcement) -> GuardResult<()> {
        {
            let guard = Guard::new(&self.store, &self.config);
            let rules = self.rules_for(record.type_id);
            if self.store.contains(record.id) {
                guard.validate_update(Target::Record(record), rules, None, enforcement)?;
            } else {
                guard.validate_create(record, rules, enforcement)?;
            }
        }
        self.store.commit(record)?;
        Ok(())
    }

    /// Draft, fill and save a record in one step.
    pub fn create(
        &mut self,
        type_name: &str,
        fields: Fields,
        enforcement: Enforcement,
    ) -> GuardResult<RecordId> {
        let mut record = self.store.draft(type_name)?;
        record.fields.extend(fields);
        self.save(&record, enforcement)?;
        Ok(record.id)
    }

    /// Delete a persisted record.
    pub fn delete(&mut self, id: RecordId, enforcement: Enforcement) -> GuardResult<Record> {
        {
            let record = self.store.get(id).ok_or(StoreError::RecordNotFound(id))?;
            let guard = Guard::new(&self.store, &self.config);
            guard.validate_delete(
                Target::Record(record),
                self.rules_for(record.type_id),
                enforcement,
            )?;
        }
        Ok(self.store.delete(id)?)
    }

    /// Apply the same changes to every record of a selection.
    ///
    /// The updated fields are the keys of `changes`.
    pub fn update(
        &mut self,
        selection: &Selection,
        changes: &Fields,
        enforcement: Enforcement,
    ) -> GuardResult<usize> {
        let records = self.store.fetch(selection);
        if records.is_empty() {
            return Ok(0);
        }
        let fields: BTreeSet<String> = changes.keys().cloned().collect();
        self.validate_batch(&records, &fields, enforcement)?;
        Ok(self.store.update_selection(selection, changes)?)
    }

    /// Write `fields` of each in-memory record; other fields keep their
    /// persisted values.
    pub fn bulk_update(
        &mut self,
        records: &[Record],
        fields: &[&str],
        enforcement: Enforcement,
    ) -> GuardResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let field_set: BTreeSet<String> = fields.iter().map(|f| f.to_string()).collect();
        self.validate_batch(records, &field_set, enforcement)?;

        let mut merged = Vec::with_capacity(records.len());
        for record in records {
            let mut stored = self
                .store
                .get(record.id)
                .cloned()
                .ok_or(StoreError::RecordNotFound(record.id))?;
            for field in &field_set {
                stored.set(field.clone(), record.value(field));
            }
            merged.push(stored);
        }
        self.store.commit_all(&merged)?;
        Ok(merged.len())
    }

    fn validate_batch(
        &self,
        records: &[Record],
        fields: &BTreeSet<String>,
        enforcement: Enforcement,
    ) -> GuardResult<()> {
        let guard = Guard::new(&self.store, &self.config);
        let Some(first) = records.first() else {
            return Ok(());
        };
        guard.validate_update(
            Target::Collection(records),
            self.rules_for(first.type_id),
            Some(fields),
            enforcement,
        )
    }
}
