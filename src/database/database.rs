//! # Façade
//!
//! [`Database`] owns one connection and the per-connection set of record
//! types already confirmed to have a backing table. Every operation is
//! synchronous and blocks until the engine completes; each statement
//! auto-commits on its own, so multi-statement operations carry no atomicity
//! guarantee across statements.
//!
//! ## Confinement
//!
//! One façade, one thread: the known-tables cache is per-instance mutable
//! state (the type is deliberately `!Sync`). Callers that want parallelism
//! construct one façade per connection, each with its own cache. A second
//! façade opened against the same backing file observes rows committed by
//! the first.

use crate::error::DbError;
use crate::query::{FilterDescriptor, SortDescriptor, SortOrder};
use crate::records::decoder::{self, NestedLookup, RowCursor};
use crate::records::encoder::{self, EncodingSnapshot};
use crate::records::{FieldValue, Record, RecordValue};
use crate::schema::{Field, RecordSchema};
use crate::sql::statement;
use crate::types::Value;
use eyre::Result;
use hashbrown::HashSet;
use std::cell::RefCell;
use std::path::Path;

/// The object-relational façade over one storage connection.
pub struct Database {
    accessor: super::StorageAccessor,
    known_tables: RefCell<HashSet<String>>,
}

impl Database {
    /// Opens a façade over the backing file at `path`, creating the file on
    /// first use.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let accessor = super::StorageAccessor::open(path.as_ref())?;
        Ok(Database {
            accessor,
            known_tables: RefCell::new(HashSet::new()),
        })
    }

    /// Inserts one record, creating backing tables on first use. A record
    /// with nested children inserts one row per touched record type.
    pub fn insert<O: Record>(&self, record: &O) -> Result<()> {
        let snapshot = encoder::encode(&record.to_record()?)?;
        self.create_tables_if_needed(&snapshot)?;
        for table in snapshot.tables() {
            self.accessor
                .execute(&statement::insert(table.schema.name(), &table.entries))?;
        }
        Ok(())
    }

    /// Deletes one record: one DELETE per record type in its encoding,
    /// keyed by that type's primary-key literal.
    pub fn delete<O: Record>(&self, record: &O) -> Result<()> {
        let snapshot = encoder::encode(&record.to_record()?)?;
        for table in snapshot.tables() {
            let primary_key = table.schema.primary_key();
            let entry = table
                .entries
                .iter()
                .find(|e| e.name == primary_key)
                .ok_or_else(|| {
                    DbError::UnsupportedType(format!(
                        "encoding of '{}' has no primary-key entry",
                        table.schema.name()
                    ))
                })?;
            self.accessor.execute(&statement::delete(
                table.schema.name(),
                primary_key,
                &entry.literal,
            ))?;
        }
        Ok(())
    }

    /// Replaces one record by deleting it and inserting it again.
    ///
    /// **Not atomic**: if the insert fails after the delete succeeded, the
    /// record is lost. The delete's own failure (for instance, no previous
    /// row) is ignored. Known design limitation.
    pub fn update<O: Record>(&self, record: &O) -> Result<()> {
        let _ = self.delete(record);
        self.insert(record)
    }

    /// Every stored record of `O`.
    pub fn get_all<O: Record>(&self) -> Result<Vec<O>> {
        self.get_all_with(None, None)
    }

    /// Every stored record of `O` matching `filter`.
    pub fn get_all_filtered<O: Record>(&self, filter: &FilterDescriptor<O>) -> Result<Vec<O>> {
        self.get_all_with(None, Some(filter))
    }

    /// Every stored record of `O`, ordered by `sort`.
    pub fn get_all_sorted<O: Record>(&self, sort: &SortDescriptor<O>) -> Result<Vec<O>> {
        self.get_all_with(Some(sort), None)
    }

    /// Every stored record of `O`, optionally ordered and filtered.
    pub fn get_all_with<O: Record>(
        &self,
        sort: Option<&SortDescriptor<O>>,
        filter: Option<&FilterDescriptor<O>>,
    ) -> Result<Vec<O>> {
        if let Some(filter) = filter {
            filter.validate()?;
        }
        let rows = self.fetch(O::schema(), filter.map(|f| f.sql()), sort.map(|s| s.sql()))?;
        rows.into_iter().map(O::from_record).collect()
    }

    /// Number of stored records matching `filter`. Computed client-side by
    /// fetching the row set; O(n) per call.
    pub fn count<O: Record>(&self, filter: Option<&FilterDescriptor<O>>) -> Result<usize> {
        if let Some(filter) = filter {
            filter.validate()?;
        }
        let rows = self.fetch(O::schema(), filter.map(|f| f.sql()), None)?;
        Ok(rows.len())
    }

    /// Smallest value of `field` over the matching rows, or `None` when no
    /// row matches. Computed client-side via an ascending sort; O(n).
    pub fn min<O: Record>(
        &self,
        field: &Field<O>,
        filter: Option<&FilterDescriptor<O>>,
    ) -> Result<Option<Value>> {
        self.extremum(field, filter, SortOrder::Ascending)
    }

    /// Largest value of `field` over the matching rows, or `None` when no
    /// row matches. Computed client-side via a descending sort; O(n).
    pub fn max<O: Record>(
        &self,
        field: &Field<O>,
        filter: Option<&FilterDescriptor<O>>,
    ) -> Result<Option<Value>> {
        self.extremum(field, filter, SortOrder::Descending)
    }

    /// Drops the backing table of `O` and forgets it was ever confirmed.
    pub fn drop_table<O: Record>(&self) -> Result<()> {
        let identifier = O::schema().name();
        let result = self.accessor.execute(&statement::drop_table(identifier));
        self.known_tables.borrow_mut().remove(identifier);
        result
    }

    fn extremum<O: Record>(
        &self,
        field: &Field<O>,
        filter: Option<&FilterDescriptor<O>>,
        order: SortOrder,
    ) -> Result<Option<Value>> {
        if let Some(filter) = filter {
            filter.validate()?;
        }
        let sort = SortDescriptor::by_with_order(&[field], order);
        let rows = self.fetch(O::schema(), filter.map(|f| f.sql()), Some(sort.sql()))?;
        let first = match rows.into_iter().next() {
            Some(row) => row,
            None => return Ok(None),
        };
        match first.field(field.name()) {
            Some(FieldValue::Value(value)) => Ok(Some(value.clone())),
            Some(FieldValue::Null) => Ok(None),
            _ => Err(DbError::UnsupportedType(format!(
                "field '{}' of '{}' is not a primitive column",
                field.name(),
                O::schema().name()
            ))
            .into()),
        }
    }

    /// Select + decode for one record type, shared by the typed reads and
    /// the nested-lookup path.
    fn fetch(
        &self,
        schema: &'static RecordSchema,
        filter: Option<&str>,
        sort: Option<&str>,
    ) -> Result<Vec<RecordValue>> {
        let sql = statement::select_all(schema.name(), filter, sort);
        let rows = self.accessor.query_rows(&sql)?;
        rows.into_iter()
            .map(|columns| {
                let mut cursor = RowCursor::new(columns);
                decoder::decode(schema, &mut cursor, self)
            })
            .collect()
    }

    fn create_tables_if_needed(&self, snapshot: &EncodingSnapshot) -> Result<()> {
        for table in snapshot.tables() {
            let identifier = table.schema.name();
            let known = self.known_tables.borrow().contains(identifier);
            if known {
                continue;
            }
            if !self
                .accessor
                .query_has_row(&statement::table_exists(identifier))?
            {
                tracing::debug!(table = identifier, "creating backing table");
                self.accessor.execute(&statement::create_table(
                    identifier,
                    &table.entries,
                    table.schema.primary_key(),
                ))?;
            }
            self.known_tables
                .borrow_mut()
                .insert(identifier.to_string());
        }
        Ok(())
    }
}

impl NestedLookup for Database {
    fn fetch_by_primary_key(
        &self,
        schema: &'static RecordSchema,
        key_literal: &str,
    ) -> Result<Vec<RecordValue>> {
        let filter = format!("{} = {}", schema.primary_key(), key_literal);
        self.fetch(schema, Some(&filter), None)
    }
}
