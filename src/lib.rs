//! # RelDB - Embedded Object-Relational Mapping Engine
//!
//! RelDB maps typed record structs onto tables of an embedded SQL engine.
//! Schemas are declared once per record type, registered for the process
//! lifetime, and every operation is driven from them: tables are created
//! lazily on first insert, nested record fields become foreign-key style
//! references to the child's own table, and reads rebuild whole object
//! graphs through secondary key lookups.
//!
//! ## Quick Start
//!
//! ```ignore
//! use reldb::{Database, DataType, Record, RecordSchema, SortDescriptor};
//!
//! let db = Database::open("./library.db")?;
//! db.insert(&track)?;
//!
//! let short = Track::field("length").lt(300i32);
//! let by_title = SortDescriptor::by(&[&Track::field("title")]);
//! let hits: Vec<Track> = db.get_all_with(Some(&by_title), Some(&short))?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │        Public API (Database)          │
//! ├──────────────────────────────────────┤
//! │  Encoder / Decoder (RecordValue tree) │
//! ├───────────────────┬──────────────────┤
//! │  Schema & Fields  │ Filter/Sort text │
//! ├───────────────────┴──────────────────┤
//! │     Statement Factory (pure text)     │
//! ├──────────────────────────────────────┤
//! │   Storage Accessor (engine wrapper)   │
//! └──────────────────────────────────────┘
//! ```
//!
//! All values travel as rendered literals inside statement text; the engine
//! binding is used for stepping statements and reading raw columns only.
//!
//! ## Module Overview
//!
//! - [`types`]: value model, data types, literal codec
//! - [`schema`]: record schemas, builders, typed field handles
//! - [`records`]: the generic record-value tree, encoder and decoder
//! - [`query`]: filter and sort descriptor algebra
//! - [`sql`]: pure statement rendering
//! - [`database`]: the storage accessor and the façade

pub mod database;
pub mod error;
pub mod query;
pub mod records;
pub mod schema;
pub mod sql;
pub mod types;

pub use database::{Database, StorageAccessor};
pub use error::DbError;
pub use query::{FilterDescriptor, SortDescriptor, SortOrder};
pub use records::{FieldValue, Record, RecordValue};
pub use schema::{Field, FieldDef, FieldKind, RecordSchema, RecordSchemaBuilder};
pub use types::{DataType, Value};
