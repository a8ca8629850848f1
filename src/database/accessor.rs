//! # Storage Accessor
//!
//! Thin I/O wrapper over the embedded engine: open a connection, prepare a
//! statement, step it, read raw columns. Statements finalize when the
//! prepared handle drops. Nothing above this module sees the engine API;
//! everything below the façade is plain SQL text in and [`RawValue`] rows
//! out.
//!
//! Row sets are fully materialized before they are returned, so no engine
//! cursor stays open across the nested lookups the decoder issues, and
//! end-of-rows is simply the end of the returned vector, never an error a
//! caller could see.

use crate::error::DbError;
use crate::types::{RawRow, RawValue};
use eyre::Result;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;

/// Owns the engine connection and executes prepared statement text.
pub struct StorageAccessor {
    connection: Connection,
}

impl StorageAccessor {
    /// Opens (or creates) the backing file.
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open(path).map_err(|e| DbError::CannotOpen {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Ok(StorageAccessor { connection })
    }

    fn prepare<'c>(&'c self, sql: &str) -> Result<rusqlite::Statement<'c>> {
        self.connection
            .prepare(sql)
            .map_err(|e| DbError::PreparationFailed(e.to_string()).into())
    }

    /// Executes a statement that returns no rows.
    pub fn execute(&self, sql: &str) -> Result<()> {
        tracing::debug!(statement = sql, "execute");
        let mut statement = self.prepare(sql)?;
        statement
            .raw_execute()
            .map_err(|e| DbError::ExecutionFailed(e.to_string()))?;
        Ok(())
    }

    /// Steps a query to completion, materializing every row by storage
    /// class.
    pub fn query_rows(&self, sql: &str) -> Result<Vec<RawRow>> {
        tracing::debug!(statement = sql, "query");
        let mut statement = self.prepare(sql)?;
        let column_count = statement.column_count();
        let mut rows = statement.raw_query();
        let mut out = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| DbError::ExecutionFailed(e.to_string()))?
        {
            let mut columns = RawRow::with_capacity(column_count);
            for index in 0..column_count {
                let value = row
                    .get_ref(index)
                    .map_err(|e| DbError::ExecutionFailed(e.to_string()))?;
                columns.push(match value {
                    ValueRef::Null => RawValue::Null,
                    ValueRef::Integer(i) => RawValue::Integer(i),
                    ValueRef::Real(f) => RawValue::Real(f),
                    ValueRef::Text(t) => RawValue::Text(String::from_utf8_lossy(t).into_owned()),
                    ValueRef::Blob(b) => RawValue::Blob(b.to_vec()),
                });
            }
            out.push(columns);
        }
        Ok(out)
    }

    /// Whether stepping the query yields at least one row. The façade's
    /// table-existence check is this boolean.
    pub fn query_has_row(&self, sql: &str) -> Result<bool> {
        tracing::debug!(statement = sql, "probe");
        let mut statement = self.prepare(sql)?;
        let mut rows = statement.raw_query();
        let first = rows
            .next()
            .map_err(|e| DbError::ExecutionFailed(e.to_string()))?;
        Ok(first.is_some())
    }
}
