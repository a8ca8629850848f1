//! # Object Encoder
//!
//! Flattens a [`RecordValue`] into an [`EncodingSnapshot`]: per touched
//! record type, the ordered `(name, type name, literal)` entries the
//! statement factory renders from.
//!
//! ## Nesting
//!
//! A nested-record field encodes in two steps. The child is encoded
//! recursively and registered under its own identifier, merged with any
//! entries already collected for that identifier rather than replacing them.
//! Then
//! the parent's entry list gets a foreign-key-style entry whose literal is
//! the child's primary-key literal. The foreign-key column is always typed
//! as text, whatever the child key's kind.
//!
//! ## Merge Invariant
//!
//! Within one identifier, field names stay unique: when two nesting paths
//! contribute entries for the same identifier, the first writer wins per
//! column name.
//!
//! The snapshot is ephemeral: built per encode call, discarded after the
//! statements are rendered.

use crate::error::DbError;
use crate::records::{FieldValue, RecordValue};
use crate::schema::{FieldKind, RecordSchema};
use crate::types::{codec, DataType};
use eyre::Result;
use hashbrown::HashMap;

/// Literal text for an absent value.
pub const NULL_LITERAL: &str = "NULL";

/// A resolved (name, type name, literal) triple, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub name: String,
    pub type_name: String,
    pub literal: String,
}

/// All entries collected for one record type.
#[derive(Debug)]
pub struct TableEncoding {
    pub schema: &'static RecordSchema,
    pub entries: Vec<FieldEntry>,
}

/// Field entries per record-type identifier touched by one encode call, in
/// first-touch order.
#[derive(Debug, Default)]
pub struct EncodingSnapshot {
    order: Vec<String>,
    tables: HashMap<String, TableEncoding>,
}

impl EncodingSnapshot {
    /// Tables in first-touch order. For a record with nested children this
    /// yields the children before their parent, so inserts of referenced
    /// rows happen first.
    pub fn tables(&self) -> impl Iterator<Item = &TableEncoding> {
        self.order.iter().map(|id| &self.tables[id])
    }

    pub fn get(&self, identifier: &str) -> Option<&TableEncoding> {
        self.tables.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn merge(&mut self, schema: &'static RecordSchema, entries: Vec<FieldEntry>) {
        match self.tables.get_mut(schema.name()) {
            None => {
                self.order.push(schema.name().to_string());
                self.tables
                    .insert(schema.name().to_string(), TableEncoding { schema, entries });
            }
            Some(existing) => {
                // First writer wins per column name.
                for entry in entries {
                    if !existing.entries.iter().any(|e| e.name == entry.name) {
                        existing.entries.push(entry);
                    }
                }
            }
        }
    }
}

/// Flattens one record instance into a snapshot covering every record type
/// it touches.
pub fn encode(record: &RecordValue) -> Result<EncodingSnapshot> {
    let mut snapshot = EncodingSnapshot::default();
    let entries = encode_record(record, &mut snapshot)?;
    snapshot.merge(record.schema(), entries);
    Ok(snapshot)
}

fn encode_record(
    record: &RecordValue,
    snapshot: &mut EncodingSnapshot,
) -> Result<Vec<FieldEntry>> {
    let schema = record.schema();
    let mut entries = Vec::with_capacity(schema.fields().len());

    for (def, slot) in schema.fields().iter().zip(record.fields()) {
        match (&def.kind, slot) {
            (FieldKind::Value(kind), FieldValue::Value(value)) => {
                if !value.matches(kind) {
                    return Err(DbError::UnsupportedType(format!(
                        "field '{}' of '{}' declared {kind:?} but holds {value:?}",
                        def.name,
                        schema.name()
                    ))
                    .into());
                }
                entries.push(FieldEntry {
                    name: def.name.clone(),
                    type_name: codec::type_name(kind, !def.nullable),
                    literal: codec::literal(value)?,
                });
            }
            (FieldKind::Value(kind), FieldValue::Null) => {
                if !def.nullable {
                    return Err(missing(schema, &def.name));
                }
                entries.push(FieldEntry {
                    name: def.name.clone(),
                    type_name: codec::type_name(kind, false),
                    literal: NULL_LITERAL.to_string(),
                });
            }
            (FieldKind::Nested(child_schema), FieldValue::Nested(child)) => {
                if !std::ptr::eq(*child_schema, child.schema()) {
                    return Err(DbError::UnsupportedType(format!(
                        "field '{}' of '{}' declared nested '{}' but holds '{}'",
                        def.name,
                        schema.name(),
                        child_schema.name(),
                        child.schema().name()
                    ))
                    .into());
                }
                let child_entries = encode_record(child, snapshot)?;
                let key_literal = child_entries
                    .iter()
                    .find(|e| e.name == child_schema.primary_key())
                    .map(|e| e.literal.clone())
                    .ok_or_else(|| {
                        DbError::UnsupportedType(format!(
                            "nested '{}' has no resolvable primary-key entry",
                            child_schema.name()
                        ))
                    })?;
                snapshot.merge(child_schema, child_entries);
                entries.push(FieldEntry {
                    name: def.name.clone(),
                    type_name: codec::type_name(&DataType::Text, !def.nullable),
                    literal: key_literal,
                });
            }
            (FieldKind::Nested(_), FieldValue::Null) => {
                if !def.nullable {
                    return Err(missing(schema, &def.name));
                }
                entries.push(FieldEntry {
                    name: def.name.clone(),
                    type_name: codec::type_name(&DataType::Text, false),
                    literal: NULL_LITERAL.to_string(),
                });
            }
            (FieldKind::Value(_), FieldValue::Nested(_)) => {
                return Err(DbError::UnsupportedType(format!(
                    "field '{}' of '{}' declared a value kind but holds a nested record",
                    def.name,
                    schema.name()
                ))
                .into());
            }
            (FieldKind::Nested(_), FieldValue::Value(_)) => {
                return Err(DbError::UnsupportedType(format!(
                    "field '{}' of '{}' declared a nested record but holds a value",
                    def.name,
                    schema.name()
                ))
                .into());
            }
        }
    }

    Ok(entries)
}

fn missing(schema: &RecordSchema, field: &str) -> eyre::Report {
    DbError::UnsupportedType(format!(
        "non-nullable field '{field}' of '{}' has no value",
        schema.name()
    ))
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    static PROFILE: LazyLock<RecordSchema> = LazyLock::new(|| {
        RecordSchema::builder("Profile")
            .field("email", DataType::Text)
            .field("age", DataType::UInt8)
            .primary_key("email")
            .build()
    });

    static ACCOUNT: LazyLock<RecordSchema> = LazyLock::new(|| {
        RecordSchema::builder("Account")
            .field("name", DataType::Text)
            .nested("profile", &PROFILE)
            .nullable_field("note", DataType::Text)
            .primary_key("name")
            .build()
    });

    static PAIR: LazyLock<RecordSchema> = LazyLock::new(|| {
        RecordSchema::builder("Pair")
            .field("id", DataType::Text)
            .nested("left", &PROFILE)
            .nested("right", &PROFILE)
            .primary_key("id")
            .build()
    });

    fn profile(email: &str, age: u8) -> RecordValue {
        let mut record = RecordValue::new(&PROFILE);
        record.set("email", FieldValue::value(email)).unwrap();
        record.set("age", FieldValue::value(age)).unwrap();
        record
    }

    #[test]
    fn flat_record_encodes_in_declared_order() {
        let snapshot = encode(&profile("a@b.c", 33)).unwrap();
        assert_eq!(snapshot.len(), 1);

        let table = snapshot.get("Profile").unwrap();
        assert_eq!(
            table.entries,
            vec![
                FieldEntry {
                    name: "email".into(),
                    type_name: "LONGTEXT NOT NULL".into(),
                    literal: "\"a%40b.c\"".into(),
                },
                FieldEntry {
                    name: "age".into(),
                    type_name: "TINYINT UNSIGNED NOT NULL".into(),
                    literal: "33".into(),
                },
            ]
        );
    }

    #[test]
    fn absent_optional_renders_null_with_nullable_type() {
        let mut account = RecordValue::new(&ACCOUNT);
        account.set("name", FieldValue::value("paul")).unwrap();
        account
            .set("profile", FieldValue::nested(profile("a@b.c", 33)))
            .unwrap();

        let snapshot = encode(&account).unwrap();
        let note = &snapshot.get("Account").unwrap().entries[2];
        assert_eq!(note.type_name, "LONGTEXT");
        assert_eq!(note.literal, "NULL");
    }

    #[test]
    fn absent_required_field_is_an_error() {
        let mut record = RecordValue::new(&PROFILE);
        record.set("email", FieldValue::value("a@b.c")).unwrap();
        let err = encode(&record).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::UnsupportedType(_))
        ));
    }

    #[test]
    fn nested_record_registers_child_and_foreign_key_entry() {
        let mut account = RecordValue::new(&ACCOUNT);
        account.set("name", FieldValue::value("paul")).unwrap();
        account
            .set("profile", FieldValue::nested(profile("a@b.c", 33)))
            .unwrap();
        account.set("note", FieldValue::value("hi")).unwrap();

        let snapshot = encode(&account).unwrap();
        assert_eq!(snapshot.len(), 2);

        // Child registered first, so referenced rows insert before referrers.
        let order: Vec<&str> = snapshot.tables().map(|t| t.schema.name()).collect();
        assert_eq!(order, ["Profile", "Account"]);

        let fk = &snapshot.get("Account").unwrap().entries[1];
        assert_eq!(fk.name, "profile");
        assert_eq!(fk.type_name, "LONGTEXT NOT NULL");
        assert_eq!(fk.literal, "\"a%40b.c\"");
    }

    #[test]
    fn merge_across_nesting_paths_keeps_first_writer() {
        let mut pair = RecordValue::new(&PAIR);
        pair.set("id", FieldValue::value("p1")).unwrap();
        pair.set("left", FieldValue::nested(profile("first@x", 1)))
            .unwrap();
        pair.set("right", FieldValue::nested(profile("second@x", 2)))
            .unwrap();

        let snapshot = encode(&pair).unwrap();
        let table = snapshot.get("Profile").unwrap();

        // One entry list for the shared identifier, no duplicated names,
        // first writer's literals retained.
        assert_eq!(table.entries.len(), 2);
        assert_eq!(table.entries[0].literal, "\"first%40x\"");
        assert_eq!(table.entries[1].literal, "1");
    }

    #[test]
    fn absent_optional_nested_renders_null_foreign_key() {
        static LOOSE: LazyLock<RecordSchema> = LazyLock::new(|| {
            RecordSchema::builder("Loose")
                .field("id", DataType::Text)
                .nullable_nested("profile", &PROFILE)
                .primary_key("id")
                .build()
        });

        let mut record = RecordValue::new(&LOOSE);
        record.set("id", FieldValue::value("x")).unwrap();

        let snapshot = encode(&record).unwrap();
        let fk = &snapshot.get("Loose").unwrap().entries[1];
        assert_eq!(fk.type_name, "LONGTEXT");
        assert_eq!(fk.literal, "NULL");
        assert!(snapshot.get("Profile").is_none());
    }
}
