//! # Table and Field Definitions
//!
//! [`RecordSchema`] describes one record type: its table identifier, the
//! ordered field descriptors, and the primary-key field. [`FieldKind`] is
//! the tagged variant that settles, once at registration, whether a field
//! holds a primitive value or a nested-record reference; nothing downstream
//! re-discovers this per call.
//!
//! ## Definition Example
//!
//! ```ignore
//! use std::sync::LazyLock;
//! use reldb::{DataType, RecordSchema};
//!
//! static PROFILE: LazyLock<RecordSchema> = LazyLock::new(|| {
//!     RecordSchema::builder("Profile")
//!         .field("email", DataType::Text)
//!         .nullable_field("bio", DataType::Text)
//!         .primary_key("email")
//!         .build()
//! });
//!
//! static ACCOUNT: LazyLock<RecordSchema> = LazyLock::new(|| {
//!     RecordSchema::builder("Account")
//!         .field("name", DataType::Text)
//!         .nested("profile", &PROFILE)
//!         .primary_key("name")
//!         .build()
//! });
//! ```
//!
//! Identifiers and field names are restricted to `[A-Za-z_][A-Za-z0-9_]*`,
//! which keeps every identifier the statement factory renders injection-safe
//! without quoting.

use crate::types::DataType;

/// Whether a field holds a primitive value or references a nested record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Value(DataType),
    Nested(&'static RecordSchema),
}

/// Static metadata for one field: name, kind, nullability.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub kind: FieldKind,
    pub nullable: bool,
}

/// A named record type with ordered fields and one primary-key field.
#[derive(Debug, PartialEq)]
pub struct RecordSchema {
    name: String,
    fields: Vec<FieldDef>,
    primary_key: String,
}

impl RecordSchema {
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            primary_key: None,
        }
    }

    /// Table identifier this record type maps to.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field descriptors in declared order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Name of the primary-key field.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn field_def(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

fn valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Builder for [`RecordSchema`]. Validation happens in [`build`], which
/// panics on registration errors: a malformed schema is a programming
/// error, caught the first time the type is used.
///
/// [`build`]: RecordSchemaBuilder::build
pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<FieldDef>,
    primary_key: Option<String>,
}

impl RecordSchemaBuilder {
    pub fn field(self, name: impl Into<String>, kind: DataType) -> Self {
        self.push(name.into(), FieldKind::Value(kind), false)
    }

    pub fn nullable_field(self, name: impl Into<String>, kind: DataType) -> Self {
        self.push(name.into(), FieldKind::Value(kind), true)
    }

    pub fn nested(self, name: impl Into<String>, schema: &'static RecordSchema) -> Self {
        self.push(name.into(), FieldKind::Nested(schema), false)
    }

    pub fn nullable_nested(self, name: impl Into<String>, schema: &'static RecordSchema) -> Self {
        self.push(name.into(), FieldKind::Nested(schema), true)
    }

    pub fn primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = Some(name.into());
        self
    }

    fn push(mut self, name: String, kind: FieldKind, nullable: bool) -> Self {
        self.fields.push(FieldDef {
            name,
            kind,
            nullable,
        });
        self
    }

    /// Finalizes the schema.
    ///
    /// # Panics
    ///
    /// Panics when the table identifier or a field name is not a valid
    /// identifier, a field name repeats, or the primary key is missing or
    /// does not name a declared field.
    pub fn build(self) -> RecordSchema {
        assert!(
            valid_identifier(&self.name),
            "'{}' is not a valid table identifier",
            self.name
        );
        for (i, field) in self.fields.iter().enumerate() {
            assert!(
                valid_identifier(&field.name),
                "'{}' is not a valid field name",
                field.name
            );
            assert!(
                !self.fields[..i].iter().any(|f| f.name == field.name),
                "duplicate field name '{}' in schema '{}'",
                field.name,
                self.name
            );
        }
        let primary_key = self
            .primary_key
            .unwrap_or_else(|| panic!("schema '{}' declares no primary key", self.name));
        assert!(
            self.fields.iter().any(|f| f.name == primary_key),
            "primary key '{}' is not a declared field of schema '{}'",
            primary_key,
            self.name
        );
        RecordSchema {
            name: self.name,
            fields: self.fields,
            primary_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_declared_field_order() {
        let schema = RecordSchema::builder("Track")
            .field("title", DataType::Text)
            .field("length", DataType::Int32)
            .nullable_field("rating", DataType::Int8)
            .primary_key("title")
            .build();

        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["title", "length", "rating"]);
        assert_eq!(schema.primary_key(), "title");
        assert!(schema.fields()[2].nullable);
    }

    #[test]
    #[should_panic(expected = "declares no primary key")]
    fn build_rejects_missing_primary_key() {
        RecordSchema::builder("Track")
            .field("title", DataType::Text)
            .build();
    }

    #[test]
    #[should_panic(expected = "is not a declared field")]
    fn build_rejects_unknown_primary_key() {
        RecordSchema::builder("Track")
            .field("title", DataType::Text)
            .primary_key("id")
            .build();
    }

    #[test]
    #[should_panic(expected = "duplicate field name")]
    fn build_rejects_duplicate_field_names() {
        RecordSchema::builder("Track")
            .field("title", DataType::Text)
            .field("title", DataType::Int32)
            .primary_key("title")
            .build();
    }

    #[test]
    #[should_panic(expected = "not a valid table identifier")]
    fn build_rejects_identifier_with_metacharacters() {
        RecordSchema::builder("Track; DROP TABLE x")
            .field("title", DataType::Text)
            .primary_key("title")
            .build();
    }
}
