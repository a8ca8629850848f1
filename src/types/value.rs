//! # Runtime Value Representation
//!
//! [`Value`] is the owned runtime form of every primitive admitted by the
//! codec. Unlike the declared [`DataType`], a `Value` carries its payload, so
//! encoding needs no further type dispatch.
//!
//! [`RawValue`] is the other end of the pipeline: one column as the storage
//! engine actually holds it. SQLite stores by storage class, not declared
//! type, so the decoder matches on `RawValue` and coerces into the declared
//! kind.
//!
//! [`FromValue`] converts decoded values back into plain Rust types when a
//! record rebuilds itself from a [`RecordValue`](crate::records::RecordValue).

use crate::error::DbError;
use crate::types::DataType;
use chrono::NaiveDateTime;
use eyre::Result;

/// Owned runtime value of a primitive record field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Timestamp(NaiveDateTime),
    /// Enumeration case name.
    Enum(String),
    /// Collection serialized as one delimited text column.
    List(Vec<Value>),
}

impl Value {
    /// Checks that this value is admissible for the declared kind.
    ///
    /// Enum values must name a declared case; list members are checked
    /// against the element kind.
    pub fn matches(&self, declared: &DataType) -> bool {
        match (self, declared) {
            (Value::Text(_), DataType::Text) => true,
            (Value::Bool(_), DataType::Bool) => true,
            (Value::Int8(_), DataType::Int8) => true,
            (Value::Int16(_), DataType::Int16) => true,
            (Value::Int32(_), DataType::Int32) => true,
            (Value::Int64(_), DataType::Int64) => true,
            (Value::UInt8(_), DataType::UInt8) => true,
            (Value::UInt16(_), DataType::UInt16) => true,
            (Value::UInt32(_), DataType::UInt32) => true,
            (Value::UInt64(_), DataType::UInt64) => true,
            (Value::Float32(_), DataType::Float32) => true,
            (Value::Float64(_), DataType::Float64) => true,
            (Value::Timestamp(_), DataType::Timestamp) => true,
            (Value::Enum(case), DataType::Enum(cases)) => cases.iter().any(|c| c == case),
            (Value::List(items), DataType::List(element)) => {
                items.iter().all(|item| item.matches(element))
            }
            _ => false,
        }
    }
}

/// One materialized row as read back from the engine.
pub type RawRow = smallvec::SmallVec<[RawValue; 8]>;

/// One column as read back from the engine, by storage class.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Short storage-class name for diagnostics.
    pub fn class_name(&self) -> &'static str {
        match self {
            RawValue::Null => "NULL",
            RawValue::Integer(_) => "INTEGER",
            RawValue::Real(_) => "REAL",
            RawValue::Text(_) => "TEXT",
            RawValue::Blob(_) => "BLOB",
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

value_from! {
    String => Text,
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    NaiveDateTime => Timestamp,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Conversion from a decoded [`Value`] back into a plain Rust type.
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self>;
}

fn mismatch<T>(expected: &str, got: &Value) -> Result<T> {
    Err(DbError::UnsupportedType(format!("expected {expected}, got {got:?}")).into())
}

macro_rules! from_value {
    ($($ty:ty => $variant:ident / $name:literal),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: &Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v.clone()),
                        other => mismatch($name, other),
                    }
                }
            }
        )*
    };
}

from_value! {
    bool => Bool / "bool",
    i8 => Int8 / "i8",
    i16 => Int16 / "i16",
    i32 => Int32 / "i32",
    i64 => Int64 / "i64",
    u8 => UInt8 / "u8",
    u16 => UInt16 / "u16",
    u32 => UInt32 / "u32",
    u64 => UInt64 / "u64",
    f32 => Float32 / "f32",
    f64 => Float64 / "f64",
    NaiveDateTime => Timestamp / "timestamp",
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Text(s) | Value::Enum(s) => Ok(s.clone()),
            other => mismatch("text", other),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            other => mismatch("list", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_matches_its_declared_kind() {
        assert!(Value::Text("a".into()).matches(&DataType::Text));
        assert!(Value::Int32(5).matches(&DataType::Int32));
        assert!(!Value::Int32(5).matches(&DataType::Int64));
        assert!(!Value::Text("a".into()).matches(&DataType::Bool));
    }

    #[test]
    fn enum_value_must_name_a_declared_case() {
        let kind = DataType::enumeration(["red", "green"]);
        assert!(Value::Enum("red".into()).matches(&kind));
        assert!(!Value::Enum("blue".into()).matches(&kind));
    }

    #[test]
    fn list_members_are_checked_against_the_element_kind() {
        let kind = DataType::list(DataType::Int32);
        assert!(Value::from(vec![1i32, 2, 3]).matches(&kind));
        assert!(!Value::from(vec!["a", "b"]).matches(&kind));
    }

    #[test]
    fn from_value_round_trips_primitives() {
        assert_eq!(i64::from_value(&Value::Int64(-7)).unwrap(), -7);
        assert_eq!(String::from_value(&Value::Text("hi".into())).unwrap(), "hi");
        let items: Vec<u16> = Vec::from_value(&Value::from(vec![1u16, 2])).unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn from_value_rejects_kind_mismatch() {
        let err = bool::from_value(&Value::Int8(1)).unwrap_err();
        assert!(err.downcast_ref::<DbError>().is_some());
    }
}
