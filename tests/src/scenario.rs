//! Scenario definitions.
//!
//! A scenario registers rule sets, seeds records under aliases, then runs
//! guarded steps and checks each outcome against an assertion.

use std::collections::HashMap;

use latch_core::{Fields, Record, RecordId, TypeId, Value};
use latch_guard::{Enforcement, GuardConfig, GuardedStore, RuleSet};

use crate::assertion::{Assertion, AssertionBuilder, Outcome};
use crate::error::{ScenarioError, ScenarioResult};
use crate::fixtures;

// ==================== Operations ====================

#[derive(Debug, Clone)]
enum OpKind {
    Create { alias: String, type_name: String },
    Set { alias: String },
    Delete { alias: String },
    UpdateAll { type_name: String },
    BulkUpdate { aliases: Vec<String> },
}

/// A guarded write performed by a step.
#[derive(Debug, Clone)]
pub struct Op {
    kind: OpKind,
    fields: Fields,
    links: Vec<(String, String)>,
    enforcement: Enforcement,
}

impl Op {
    fn new(kind: OpKind, fields: Fields) -> Self {
        Self {
            kind,
            fields,
            links: Vec::new(),
            enforcement: Enforcement::Enforce,
        }
    }

    /// Create a record of `type_name` and remember it as `alias`.
    pub fn create(alias: &str, type_name: &str, fields: Fields) -> Self {
        Self::new(
            OpKind::Create {
                alias: alias.to_string(),
                type_name: type_name.to_string(),
            },
            fields,
        )
    }

    /// Change fields of an aliased record and save it.
    pub fn set(alias: &str, fields: Fields) -> Self {
        Self::new(
            OpKind::Set {
                alias: alias.to_string(),
            },
            fields,
        )
    }

    pub fn delete(alias: &str) -> Self {
        Self::new(
            OpKind::Delete {
                alias: alias.to_string(),
            },
            Fields::new(),
        )
    }

    /// Apply `changes` to every record of `type_name` in one batch.
    pub fn update_all(type_name: &str, changes: Fields) -> Self {
        Self::new(
            OpKind::UpdateAll {
                type_name: type_name.to_string(),
            },
            changes,
        )
    }

    /// Set `fields` on each aliased record in memory, then bulk update them.
    pub fn bulk_update(aliases: &[&str], fields: Fields) -> Self {
        Self::new(
            OpKind::BulkUpdate {
                aliases: aliases.iter().map(|a| a.to_string()).collect(),
            },
            fields,
        )
    }

    /// Point `field` at the record known as `alias`.
    ///
    /// Linking a many-valued relation more than once appends.
    pub fn link(mut self, field: &str, alias: &str) -> Self {
        self.links.push((field.to_string(), alias.to_string()));
        self
    }

    pub fn forced(mut self) -> Self {
        self.enforcement = Enforcement::Force;
        self
    }
}

// ==================== World ====================

/// The guarded store a scenario runs against, with its record aliases.
#[derive(Debug)]
pub struct World {
    store: GuardedStore,
    aliases: HashMap<String, RecordId>,
}

impl World {
    pub fn new(store: GuardedStore) -> Self {
        Self {
            store,
            aliases: HashMap::new(),
        }
    }

    pub fn store(&self) -> &GuardedStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GuardedStore {
        &mut self.store
    }

    pub fn id(&self, alias: &str) -> Option<RecordId> {
        self.aliases.get(alias).copied()
    }

    /// The persisted record behind an alias.
    pub fn record(&self, alias: &str) -> Option<&Record> {
        self.id(alias).and_then(|id| self.store.get(id))
    }

    /// A persisted field value, `Null` for unknown aliases or fields.
    pub fn value(&self, alias: &str, field: &str) -> Value {
        self.record(alias)
            .map(|r| r.value(field))
            .unwrap_or(Value::Null)
    }

    /// Run an operation. Alias errors fail the scenario; guard errors are
    /// returned as the outcome.
    pub fn apply(&mut self, step: &str, op: &Op) -> ScenarioResult<Outcome> {
        match &op.kind {
            OpKind::Create { alias, type_name } => {
                let type_id = match self.store.store().type_id(type_name) {
                    Ok(type_id) => type_id,
                    Err(e) => return Ok(Err(e.into())),
                };
                let mut fields = op.fields.clone();
                self.apply_links(step, type_id, &mut fields, &op.links)?;
                let outcome = self.store.create(type_name, fields, op.enforcement);
                Ok(outcome.map(|id| {
                    self.aliases.insert(alias.clone(), id);
                    1
                }))
            }
            OpKind::Set { alias } => {
                let mut record = self.persisted(step, alias)?;
                let mut fields = op.fields.clone();
                self.apply_links(step, record.type_id, &mut fields, &op.links)?;
                record.fields.extend(fields);
                Ok(self.store.save(&record, op.enforcement).map(|()| 1))
            }
            OpKind::Delete { alias } => {
                let id = self.resolve(step, alias)?;
                Ok(self.store.delete(id, op.enforcement).map(|_| 1))
            }
            OpKind::UpdateAll { type_name } => {
                let selection = match self.store.store().select_all(type_name) {
                    Ok(selection) => selection,
                    Err(e) => return Ok(Err(e.into())),
                };
                Ok(self.store.update(&selection, &op.fields, op.enforcement))
            }
            OpKind::BulkUpdate { aliases } => {
                let mut records = Vec::with_capacity(aliases.len());
                for alias in aliases {
                    let mut record = self.persisted(step, alias)?;
                    record.fields.extend(op.fields.clone());
                    records.push(record);
                }
                let names: Vec<&str> = op.fields.keys().map(String::as_str).collect();
                Ok(self.store.bulk_update(&records, &names, op.enforcement))
            }
        }
    }

    fn resolve(&self, step: &str, alias: &str) -> ScenarioResult<RecordId> {
        self.id(alias)
            .ok_or_else(|| ScenarioError::unknown_alias(step, alias))
    }

    fn persisted(&self, step: &str, alias: &str) -> ScenarioResult<Record> {
        self.record(alias)
            .cloned()
            .ok_or_else(|| ScenarioError::unknown_alias(step, alias))
    }

    fn apply_links(
        &self,
        step: &str,
        type_id: TypeId,
        fields: &mut Fields,
        links: &[(String, String)],
    ) -> ScenarioResult<()> {
        let schema = self.store.store().schema();
        for (field, alias) in links {
            let target = Value::Ref(self.resolve(step, alias)?);
            let multi = schema
                .field(type_id, field)
                .is_some_and(|f| f.multi_valued);
            if multi {
                match fields.entry(field.clone()).or_insert_with(|| Value::List(Vec::new())) {
                    Value::List(items) => items.push(target),
                    other => *other = Value::List(vec![target]),
                }
            } else {
                fields.insert(field.clone(), target);
            }
        }
        Ok(())
    }
}

// ==================== Scenario ====================

/// A step in a scenario.
#[derive(Debug)]
pub struct Step {
    pub name: String,
    pub op: Op,
    pub assertion: Assertion,
}

/// A test scenario over the fixture schema.
#[derive(Debug)]
pub struct Scenario {
    name: String,
    config: GuardConfig,
    rules: Vec<(String, RuleSet)>,
    seeds: Vec<(String, Op)>,
    steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config: GuardConfig::default(),
            rules: Vec::new(),
            seeds: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a rule set on a record type.
    pub fn rules(mut self, type_name: &str, rules: RuleSet) -> Self {
        self.rules.push((type_name.to_string(), rules));
        self
    }

    /// Seed a record before any step runs. Seeds bypass the rules.
    pub fn seed(mut self, alias: &str, type_name: &str, fields: Fields) -> Self {
        self.seeds
            .push((alias.to_string(), Op::create(alias, type_name, fields).forced()));
        self
    }

    /// Seed a record linked to earlier seeds.
    pub fn seed_linked(
        mut self,
        alias: &str,
        type_name: &str,
        fields: Fields,
        links: &[(&str, &str)],
    ) -> Self {
        let op = links
            .iter()
            .fold(Op::create(alias, type_name, fields), |op, (field, target)| {
                op.link(field, target)
            })
            .forced();
        self.seeds.push((alias.to_string(), op));
        self
    }

    pub fn step<F>(mut self, name: &str, op: Op, f: F) -> Self
    where
        F: FnOnce(AssertionBuilder) -> AssertionBuilder,
    {
        self.steps.push(Step {
            name: name.to_string(),
            op,
            assertion: f(AssertionBuilder::new()).build(),
        });
        self
    }

    /// Run every step in order. Returns the world for follow-up checks.
    pub fn run(&self) -> ScenarioResult<World> {
        let store = fixtures::guarded_store_with(self.config.clone())?;
        let mut world = World::new(store);

        for (type_name, rules) in &self.rules {
            world
                .store_mut()
                .register_rules(type_name, rules.clone())
                .map_err(|e| ScenarioError::setup(format!("{}/rules:{}", self.name, type_name), e))?;
        }

        for (alias, op) in &self.seeds {
            let step = format!("{}/seed:{}", self.name, alias);
            world
                .apply(&step, op)?
                .map_err(|e| ScenarioError::setup(&step, e))?;
        }

        for step in &self.steps {
            let outcome = world.apply(&step.name, &step.op)?;
            step.assertion.verify(&step.name, &outcome)?;
        }

        Ok(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{state_rule, IMMUTABLE, MUTABLE};
    use latch_core::fields;

    #[test]
    fn test_scenario_runs_steps_in_order() {
        let world = Scenario::new("state")
            .rules("Base", RuleSet::new().with(state_rule()))
            .seed("b", "Base", fields! { "state" => MUTABLE })
            .step("rename", Op::set("b", fields! { "name" => "x" }), |a| {
                a.allowed().written(1)
            })
            .step("lock", Op::set("b", fields! { "state" => IMMUTABLE }), |a| a.allowed())
            .step("rename_locked", Op::set("b", fields! { "name" => "y" }), |a| {
                a.violation()
            })
            .run()
            .unwrap();

        assert_eq!(world.value("b", "name"), Value::from("x"));
    }

    #[test]
    fn test_unknown_alias_fails_scenario() {
        let result = Scenario::new("missing")
            .step("set", Op::set("ghost", fields! { "name" => "x" }), |a| a.allowed())
            .run();
        assert!(matches!(result, Err(ScenarioError::UnknownAlias { .. })));
    }

    #[test]
    fn test_links_resolve_aliases() {
        let world = Scenario::new("links")
            .seed("a", "Base", fields!())
            .seed("b", "Base", fields!())
            .seed_linked("t", "Tagged", fields!(), &[("tags", "a"), ("tags", "b")])
            .run()
            .unwrap();

        let a = world.id("a").unwrap();
        let b = world.id("b").unwrap();
        assert_eq!(world.value("t", "tags"), Value::from(vec![a, b]));
    }
}
