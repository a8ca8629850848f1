//! # Statement Rendering
//!
//! Pure text builders mapping encoded field entries and rendered descriptor
//! text into DDL/DML/query statements. Nothing here touches the storage
//! engine.

pub mod statement;
