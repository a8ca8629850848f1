//! # Value Types
//!
//! Runtime value representation and the per-type codec used by the mapping
//! engine. [`Value`] is the owned runtime form of every primitive a record
//! field can hold, [`DataType`] is the declared column kind, and [`RawValue`]
//! is a column as read back from the storage engine (its storage class, not
//! its declared type).
//!
//! The [`codec`] module renders literals, names database types, and decodes
//! raw columns back into values.

pub mod codec;
mod data_type;
mod value;

pub use data_type::DataType;
pub use value::{FromValue, RawRow, RawValue, Value};
