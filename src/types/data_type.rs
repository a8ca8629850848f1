//! # Declared Column Kinds
//!
//! [`DataType`] is the static type a schema declares for a field. It drives
//! three things: the database type name in `CREATE TABLE`, the literal form
//! during encoding, and the coercion applied when a raw column is decoded.
//!
//! ## Kind Table
//!
//! | Kind | Database type | Storage class read back |
//! |------|---------------|-------------------------|
//! | Text | LONGTEXT | TEXT |
//! | Bool | TINYINT | INTEGER |
//! | Int8..Int64 | TINYINT..BIGINT | INTEGER |
//! | UInt8..UInt64 | TINYINT..BIGINT UNSIGNED | INTEGER |
//! | Float32 / Float64 | FLOAT / DOUBLE | REAL |
//! | Timestamp | DATETIME | TEXT (fixed pattern) |
//! | Enum | ENUM(cases) | TEXT (case name) |
//! | List | LONGTEXT | TEXT (delimited blob) |
//!
//! The names lean MySQL-ward (`LONGTEXT`, `ENUM(...)`) while the numeric and
//! boolean sizing follows narrower embedded-engine conventions (bool as a
//! one-byte integer type). SQLite resolves all of them through affinity.

/// Declared kind of a primitive record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Text,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Timestamp,
    /// Enumeration over a fixed set of case names.
    Enum(Vec<String>),
    /// Collection of one element kind, serialized as a single delimited
    /// text column. Lists of lists are rejected by the codec.
    List(Box<DataType>),
}

impl DataType {
    /// Convenience constructor for an enumeration kind.
    pub fn enumeration<I, S>(cases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DataType::Enum(cases.into_iter().map(Into::into).collect())
    }

    /// Convenience constructor for a list kind.
    pub fn list(element: DataType) -> Self {
        DataType::List(Box::new(element))
    }
}
