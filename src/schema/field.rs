//! # Typed Field Handles
//!
//! [`Field`] is a checked reference from a record type to one of its
//! columns, carrying the record type as a phantom parameter and the value
//! kind at runtime. Handles are how filter and sort descriptors name
//! columns without accepting arbitrary strings.
//!
//! Resolution panics on an undeclared name: handles are created next to the
//! schema they refer to, so a bad name is a registration error, not a
//! runtime condition.

use crate::schema::{FieldKind, RecordSchema};
use crate::types::DataType;
use std::marker::PhantomData;

/// Typed handle to one column of a record type.
///
/// The phantom parameter ties the handle to the record type it was resolved
/// from, so descriptors built from it only combine with descriptors of the
/// same record type.
#[derive(Debug, Clone)]
pub struct Field<O> {
    name: String,
    kind: DataType,
    _record: PhantomData<fn() -> O>,
}

impl<O> Field<O> {
    /// Resolves a handle against a schema.
    ///
    /// Nested-record fields resolve to the text kind, because their column
    /// stores the referenced record's primary-key literal as text.
    ///
    /// # Panics
    ///
    /// Panics when the schema does not declare `name`.
    pub fn resolve(schema: &RecordSchema, name: &str) -> Self {
        let def = schema.field_def(name).unwrap_or_else(|| {
            panic!("schema '{}' declares no field '{name}'", schema.name())
        });
        let kind = match &def.kind {
            FieldKind::Value(kind) => kind.clone(),
            FieldKind::Nested(_) => DataType::Text,
        };
        Field {
            name: name.to_string(),
            kind,
            _record: PhantomData,
        }
    }

    /// Column name this handle renders as.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value kind of the column.
    pub fn kind(&self) -> &DataType {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> RecordSchema {
        RecordSchema::builder("Track")
            .field("title", DataType::Text)
            .field("length", DataType::Int32)
            .primary_key("title")
            .build()
    }

    struct Track;

    #[test]
    fn resolve_carries_the_declared_kind() {
        let schema = schema();
        let handle: Field<Track> = Field::resolve(&schema, "length");
        assert_eq!(handle.name(), "length");
        assert_eq!(*handle.kind(), DataType::Int32);
    }

    #[test]
    #[should_panic(expected = "declares no field")]
    fn resolve_rejects_undeclared_names() {
        let schema = schema();
        let _: Field<Track> = Field::resolve(&schema, "artist");
    }
}
