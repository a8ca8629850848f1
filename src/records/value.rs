//! # Generic Record Values
//!
//! [`RecordValue`] is one record instance in schema-shaped form: a field
//! value per declared field, in declared order. It is the interchange format
//! between concrete record types and the generic encode/decode routines,
//! replacing per-field reflection.

use crate::error::DbError;
use crate::records::Record;
use crate::schema::RecordSchema;
use crate::types::{FromValue, Value};
use eyre::Result;

/// One field slot of a record instance.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Absent optional (primitive or nested).
    Null,
    /// Present primitive value.
    Value(Value),
    /// Present nested record.
    Nested(Box<RecordValue>),
}

impl FieldValue {
    pub fn value(v: impl Into<Value>) -> Self {
        FieldValue::Value(v.into())
    }

    pub fn opt<V: Into<Value>>(v: Option<V>) -> Self {
        match v {
            Some(v) => FieldValue::Value(v.into()),
            None => FieldValue::Null,
        }
    }

    pub fn nested(record: RecordValue) -> Self {
        FieldValue::Nested(Box::new(record))
    }

    pub fn opt_nested(record: Option<RecordValue>) -> Self {
        match record {
            Some(record) => FieldValue::Nested(Box::new(record)),
            None => FieldValue::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// A record instance in generic, schema-shaped form.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordValue {
    schema: &'static RecordSchema,
    fields: Vec<FieldValue>,
}

impl RecordValue {
    /// Creates an instance with every field slot absent.
    pub fn new(schema: &'static RecordSchema) -> Self {
        RecordValue {
            schema,
            fields: vec![FieldValue::Null; schema.fields().len()],
        }
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    /// Field slots in declared order.
    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    /// Sets a field slot by name.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let index = self.schema.field_index(name).ok_or_else(|| {
            DbError::UnsupportedType(format!(
                "schema '{}' declares no field '{name}'",
                self.schema.name()
            ))
        })?;
        self.fields[index] = value;
        Ok(())
    }

    pub(crate) fn set_index(&mut self, index: usize, value: FieldValue) {
        self.fields[index] = value;
    }

    /// Field slot by name, if declared.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.schema
            .field_index(name)
            .map(|index| &self.fields[index])
    }

    fn required(&self, name: &str) -> Result<&FieldValue> {
        self.field(name).ok_or_else(|| {
            DbError::UnsupportedType(format!(
                "schema '{}' declares no field '{name}'",
                self.schema.name()
            ))
            .into()
        })
    }

    /// Typed value of a required primitive field.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T> {
        match self.required(name)? {
            FieldValue::Value(value) => T::from_value(value),
            FieldValue::Null => Err(DbError::UnsupportedType(format!(
                "field '{name}' of '{}' is absent",
                self.schema.name()
            ))
            .into()),
            FieldValue::Nested(_) => Err(DbError::UnsupportedType(format!(
                "field '{name}' of '{}' holds a nested record, not a value",
                self.schema.name()
            ))
            .into()),
        }
    }

    /// Typed value of an optional primitive field.
    pub fn get_opt<T: FromValue>(&self, name: &str) -> Result<Option<T>> {
        match self.required(name)? {
            FieldValue::Null => Ok(None),
            FieldValue::Value(value) => T::from_value(value).map(Some),
            FieldValue::Nested(_) => Err(DbError::UnsupportedType(format!(
                "field '{name}' of '{}' holds a nested record, not a value",
                self.schema.name()
            ))
            .into()),
        }
    }

    /// Rebuilds the nested record held by a required nested field.
    pub fn nested_record<T: Record>(&self, name: &str) -> Result<T> {
        match self.required(name)? {
            FieldValue::Nested(record) => T::from_record((**record).clone()),
            other => Err(DbError::UnsupportedType(format!(
                "field '{name}' of '{}' is not a nested record (got {other:?})",
                self.schema.name()
            ))
            .into()),
        }
    }

    /// Rebuilds the nested record held by an optional nested field.
    pub fn nested_opt<T: Record>(&self, name: &str) -> Result<Option<T>> {
        match self.required(name)? {
            FieldValue::Null => Ok(None),
            FieldValue::Nested(record) => T::from_record((**record).clone()).map(Some),
            other => Err(DbError::UnsupportedType(format!(
                "field '{name}' of '{}' is not a nested record (got {other:?})",
                self.schema.name()
            ))
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DataType;
    use std::sync::LazyLock;

    static TRACK: LazyLock<RecordSchema> = LazyLock::new(|| {
        RecordSchema::builder("Track")
            .field("title", DataType::Text)
            .field("length", DataType::Int32)
            .nullable_field("rating", DataType::Int8)
            .primary_key("title")
            .build()
    });

    #[test]
    fn set_and_get_round_trip_by_name() {
        let mut record = RecordValue::new(&TRACK);
        record.set("title", FieldValue::value("intro")).unwrap();
        record.set("length", FieldValue::value(214i32)).unwrap();
        record.set("rating", FieldValue::opt(None::<i8>)).unwrap();

        assert_eq!(record.get::<String>("title").unwrap(), "intro");
        assert_eq!(record.get::<i32>("length").unwrap(), 214);
        assert_eq!(record.get_opt::<i8>("rating").unwrap(), None);
    }

    #[test]
    fn set_rejects_undeclared_field_names() {
        let mut record = RecordValue::new(&TRACK);
        assert!(record.set("artist", FieldValue::value("x")).is_err());
    }

    #[test]
    fn get_on_absent_required_field_is_an_error() {
        let record = RecordValue::new(&TRACK);
        assert!(record.get::<String>("title").is_err());
    }
}
