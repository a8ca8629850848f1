//! # Database Façade
//!
//! The orchestration layer: [`StorageAccessor`] is the thin prepare → step →
//! finalize wrapper over the storage engine, [`Database`] the façade that
//! encodes records, renders statements, dispatches them, and decodes rows
//! back into record instances.

mod accessor;
#[allow(clippy::module_inception)]
mod database;

pub use accessor::StorageAccessor;
pub use database::Database;
