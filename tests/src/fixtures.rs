//! Shared record types, rules and predicates.
//!
//! Relations between the fixture types:
//!
//! ```text
//! Related.related          -> Base            (reverse on Base: "related")
//! Profile.owner            -> Base, 1:1       (reverse on Base: "profile")
//! Tagged.tags              <-> Base           (reverse on Base: "tagged")
//! MultiForward.related     -> WithRelation    (reverse: "multiforward")
//! WithRelation.related     -> ReverseHolder   (reverse: "withrelation")
//! ReverseHolder.related    -> MultiReverse    (reverse: "reverseholder")
//! ```
//!
//! Every type has `name` and `state`; `state` defaults to immutable.

use latch_core::Record;
use latch_guard::{GuardConfig, GuardedStore};
use latch_rule::{CollectionCondition, Condition, MutabilityRule};
use latch_schema::{Schema, SchemaBuilder, SchemaError, TypeBuilder};
use latch_store::Store;

pub const MUTABLE: &str = "mutable";
pub const IMMUTABLE: &str = "immutable";

pub const DEFAULT_NAME: &str = "Mutability Model";
pub const DEFAULT_SURNAME: &str = "Model";
/// Name the `named_tx` condition looks for.
pub const ACCEPTED_NAME: &str = "tx";

fn with_state(builder: TypeBuilder<'_>) -> TypeBuilder<'_> {
    builder
        .field_with_default("name", DEFAULT_NAME)
        .field_with_default("state", IMMUTABLE)
}

/// The fixture schema.
pub fn schema() -> Result<Schema, SchemaError> {
    let mut builder = SchemaBuilder::new();
    with_state(builder.add_type("Base"))
        .field_with_default("surname", DEFAULT_SURNAME)
        .field("description")
        .done()?;
    with_state(builder.add_type("Related"))
        .relation("related", "Base")
        .done()?;
    with_state(builder.add_type("Profile"))
        .one_to_one("owner", "Base")
        .done()?;
    with_state(builder.add_type("Tagged"))
        .many_to_many("tags", "Base")
        .done()?;
    with_state(builder.add_type("MultiForward"))
        .relation("related", "WithRelation")
        .done()?;
    with_state(builder.add_type("WithRelation"))
        .relation("related", "ReverseHolder")
        .done()?;
    with_state(builder.add_type("ReverseHolder"))
        .relation("related", "MultiReverse")
        .done()?;
    with_state(builder.add_type("MultiReverse")).done()?;
    builder.build()
}

/// A guarded store over the fixture schema, without rules.
pub fn guarded_store() -> Result<GuardedStore, SchemaError> {
    guarded_store_with(GuardConfig::default())
}

pub fn guarded_store_with(config: GuardConfig) -> Result<GuardedStore, SchemaError> {
    Ok(GuardedStore::with_config(Store::new(schema()?), config))
}

/// Records are mutable while `path` ends on the mutable state.
pub fn rule_on(path: &str) -> MutabilityRule {
    MutabilityRule::new(path, [MUTABLE])
}

/// The rule most tests use: `state` must be mutable.
pub fn state_rule() -> MutabilityRule {
    rule_on("state")
}

/// Holds when the record is named [`ACCEPTED_NAME`].
pub fn named_tx() -> Condition {
    Condition::new("named_tx", |record: &Record| {
        record.str_field("name") == Some(ACCEPTED_NAME)
    })
}

/// Holds when the record has a description.
pub fn has_description() -> Condition {
    Condition::new("has_description", |record: &Record| {
        !record.value("description").is_null()
    })
}

/// Holds when every record of the batch is named [`ACCEPTED_NAME`].
pub fn all_named_tx() -> CollectionCondition {
    CollectionCondition::new("all_named_tx", |records: &[Record]| {
        records
            .iter()
            .all(|r| r.str_field("name") == Some(ACCEPTED_NAME))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use latch_core::FieldKind;

    #[test]
    fn test_fixture_schema_builds() {
        let schema = schema().unwrap();
        let base = schema.get_type_id("Base").unwrap();

        let related = schema.field(base, "related").unwrap();
        assert_eq!(related.kind, FieldKind::ReverseRelation);
        assert!(related.multi_valued);

        let profile = schema.field(base, "profile").unwrap();
        assert!(!profile.multi_valued);

        let holder = schema.get_type_id("MultiReverse").unwrap();
        assert!(schema.field(holder, "reverseholder").is_some());
    }
}
