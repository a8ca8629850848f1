//! # Filter and Sort Descriptors
//!
//! Typed expression builders over [`Field`](crate::schema::Field) handles.
//! Both descriptors are ephemeral rendered text plus a phantom record type:
//! they are built per query, handed to the statement factory, and discarded.

pub mod filter;
pub mod sort;

pub use filter::FilterDescriptor;
pub use sort::{SortDescriptor, SortOrder};
