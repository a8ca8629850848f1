//! # Record Values, Encoder, Decoder
//!
//! The middle layer of the mapping engine. A concrete record type implements
//! [`Record`], converting itself to and from the generic [`RecordValue`]
//! tree. The [`encoder`] flattens that tree into per-table field entries for
//! the statement factory; the [`decoder`] rebuilds it from a flat row,
//! issuing secondary primary-key lookups for nested references.
//!
//! Encoder and decoder both walk the schema's declared field order, and both
//! charge absent optionals exactly one column slot, which keeps their
//! column-index bookkeeping aligned.

pub mod decoder;
pub mod encoder;
mod value;

pub use value::{FieldValue, RecordValue};

use crate::schema::{Field, RecordSchema};
use eyre::Result;

/// A record type mapped one-to-one to a backing table.
///
/// Implementations pair a process-lifetime [`RecordSchema`] with conversions
/// between the concrete type and the generic [`RecordValue`] form. Both
/// conversions must follow the schema's declared field order.
pub trait Record: Sized {
    /// The statically registered schema for this record type.
    fn schema() -> &'static RecordSchema;

    /// Converts this instance into its generic field-value form.
    fn to_record(&self) -> Result<RecordValue>;

    /// Rebuilds an instance from its generic field-value form.
    fn from_record(record: RecordValue) -> Result<Self>;

    /// Resolves a typed field handle for filter and sort descriptors.
    ///
    /// # Panics
    ///
    /// Panics when the schema does not declare `name`.
    fn field(name: &str) -> Field<Self> {
        Field::resolve(Self::schema(), name)
    }
}
