//! # Object Decoder
//!
//! Rebuilds a [`RecordValue`] from a flat row. The decoder walks the same
//! declared field order the encoder used, consuming exactly one column slot
//! per field (absent optionals included), so the two stay in lockstep.
//!
//! ## Nested References
//!
//! A nested-record field stores the child's primary-key literal. The decoder
//! reads the raw column by its storage class (integer, text, or real),
//! rebuilds the key literal, and asks the [`NestedLookup`] callback for all
//! child rows with that key. Zero matches means a dangling reference and
//! fails with inconsistent-data; if several come back the first is used,
//! since primary-key uniqueness makes that case unreachable in practice.
//!
//! Rows are fully materialized before decoding starts ([`RowCursor`] owns
//! its columns), so the secondary lookups never run while an engine cursor
//! is still open.

use crate::error::DbError;
use crate::records::{FieldValue, RecordValue};
use crate::schema::{FieldKind, RecordSchema};
use crate::types::{codec, RawRow, RawValue};
use eyre::Result;

/// A positioned cursor over one materialized row.
#[derive(Debug)]
pub struct RowCursor {
    columns: RawRow,
    index: usize,
}

impl RowCursor {
    pub fn new(columns: RawRow) -> Self {
        RowCursor { columns, index: 0 }
    }

    fn peek(&self) -> Result<&RawValue> {
        self.columns.get(self.index).ok_or_else(|| {
            DbError::InconsistentData(format!(
                "row ended at column {} while more fields were declared",
                self.index
            ))
            .into()
        })
    }

    fn advance(&mut self) -> Result<RawValue> {
        let value = std::mem::replace(
            self.columns.get_mut(self.index).ok_or_else(|| {
                DbError::InconsistentData(format!(
                    "row ended at column {} while more fields were declared",
                    self.index
                ))
            })?,
            RawValue::Null,
        );
        self.index += 1;
        Ok(value)
    }
}

/// Callback for issuing the secondary queries nested references need.
pub trait NestedLookup {
    /// All rows of `schema` whose primary key equals `key_literal`, decoded.
    fn fetch_by_primary_key(
        &self,
        schema: &'static RecordSchema,
        key_literal: &str,
    ) -> Result<Vec<RecordValue>>;
}

/// Rebuilds one record instance from a positioned row cursor.
pub fn decode(
    schema: &'static RecordSchema,
    cursor: &mut RowCursor,
    lookup: &dyn NestedLookup,
) -> Result<RecordValue> {
    let mut record = RecordValue::new(schema);

    for (index, def) in schema.fields().iter().enumerate() {
        let slot = match &def.kind {
            FieldKind::Value(kind) => {
                if def.nullable && cursor.peek()?.is_null() {
                    cursor.advance()?;
                    FieldValue::Null
                } else {
                    let raw = cursor.advance()?;
                    FieldValue::Value(codec::decode(kind, &raw)?)
                }
            }
            FieldKind::Nested(child_schema) => {
                let raw = cursor.advance()?;
                if raw.is_null() {
                    if !def.nullable {
                        // Stored data violates the schema, same family as a
                        // dangling reference.
                        return Err(DbError::InconsistentData(format!(
                            "non-nullable reference '{}' of '{}' is NULL",
                            def.name,
                            schema.name()
                        ))
                        .into());
                    }
                    FieldValue::Null
                } else {
                    let key_literal = key_literal(&def.name, schema, &raw)?;
                    tracing::trace!(
                        child = child_schema.name(),
                        key = key_literal.as_str(),
                        "resolving nested reference"
                    );
                    let mut matches = lookup.fetch_by_primary_key(child_schema, &key_literal)?;
                    if matches.is_empty() {
                        return Err(DbError::InconsistentData(format!(
                            "no '{}' row with primary key {key_literal} (referenced by '{}.{}')",
                            child_schema.name(),
                            schema.name(),
                            def.name
                        ))
                        .into());
                    }
                    FieldValue::Nested(Box::new(matches.swap_remove(0)))
                }
            }
        };
        record.set_index(index, slot);
    }

    Ok(record)
}

/// Rebuilds the key literal from a raw foreign-key column. The stored text
/// form is already the escaped literal body, so it is re-quoted without
/// re-escaping.
fn key_literal(field: &str, schema: &RecordSchema, raw: &RawValue) -> Result<String> {
    match raw {
        RawValue::Integer(i) => Ok(i.to_string()),
        RawValue::Real(f) => Ok(f.to_string()),
        RawValue::Text(s) => Ok(format!("\"{s}\"")),
        RawValue::Null | RawValue::Blob(_) => Err(DbError::UnsupportedType(format!(
            "reference '{}' of '{}' stored as {} column",
            field,
            schema.name(),
            raw.class_name()
        ))
        .into()),
    }
}
