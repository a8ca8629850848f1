//! # Record Schema Descriptors
//!
//! Statically registered metadata describing how a record type maps to a
//! table: one [`RecordSchema`] per record type, holding ordered
//! [`FieldDef`]s and the designated single-column primary key.
//!
//! Schemas are defined once per type, usually in a `LazyLock`, and live for
//! the process lifetime. There is no runtime reflection: the encoder and
//! decoder both walk the declared field order, which is what keeps their
//! column-index bookkeeping in lockstep.
//!
//! [`Field`] is the typed handle a schema hands out for building filter and
//! sort descriptors.

mod field;
mod record;

pub use field::Field;
pub use record::{FieldDef, FieldKind, RecordSchema, RecordSchemaBuilder};
