//! # Error Kinds
//!
//! This module defines the structured error kinds surfaced by the mapping
//! engine. Everything is carried inside `eyre::Report`; callers who need to
//! branch on a kind downcast to [`DbError`]:
//!
//! ```ignore
//! match report.downcast_ref::<DbError>() {
//!     Some(DbError::InconsistentData(_)) => { /* dangling reference */ }
//!     _ => return Err(report),
//! }
//! ```
//!
//! ## Kinds
//!
//! | Kind | Meaning |
//! |------|---------|
//! | CannotOpen | Backing file missing or not a database |
//! | PreparationFailed | Statement did not compile, carries engine diagnostic |
//! | ExecutionFailed | Unexpected outcome from stepping a statement |
//! | UnsupportedType | Value kind not admitted by the codec, or a container shape the encode/decode protocol rejects |
//! | InconsistentData | A foreign-key reference resolved to zero rows |
//! | UnsupportedAction | Reserved for SQL features not implemented yet |
//!
//! End-of-rows is not an error kind: the accessor materializes row sets and
//! multi-row loops terminate on iterator exhaustion, so the signal never
//! reaches a caller.

use std::path::PathBuf;
use thiserror::Error;

/// Structured error kinds for the mapping engine.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("could not open database at {path}: {detail}")]
    CannotOpen { path: PathBuf, detail: String },

    #[error("statement preparation failed: {0}")]
    PreparationFailed(String),

    #[error("statement execution failed: {0}")]
    ExecutionFailed(String),

    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    #[error("inconsistent data: {0}")]
    InconsistentData(String),

    #[error("currently unsupported action: {0}")]
    UnsupportedAction(String),
}
