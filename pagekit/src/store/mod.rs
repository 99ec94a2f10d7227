//! The document-query collaborator used by both paginators
//!
//! A paginator only ever asks a store two things: how many records match a
//! filter, and which records fall inside an ordered window. That contract is
//! [`Queryable`]; everything else about the store (connections, schema,
//! seeding) lives outside this crate's pagination logic.
//!
//! # Features
//!
//! - **Contract**: [`Queryable`], [`Record`] and [`RecordId`]
//! - **Query vocabulary**: [`Filter`], [`FilterCondition`], [`SortSpec`], [`Window`], [`Selection`]
//! - **Errors**: [`StoreError`] with operation and kind
//! - **In-memory backend**: [`MemoryStore`] over JSON [`Document`]s

mod error;
mod memory;
mod query;
mod traits;

pub use error::{StoreError, StoreErrorKind, StoreOperation};
pub use memory::{Document, DocumentId, MemoryStore, ID_FIELD};
pub use query::{
    Filter, FilterCondition, FilterOperator, FilterParseError, FilterValue, Selection,
    SortDirection, SortSpec, Window,
};
pub use traits::{Queryable, Record, RecordId, StoreResult};
