//! # pagekit
//!
//! Offset and cursor pagination over any store that can count and range-query
//! its records.
//!
//! ## Features
//!
//! - **Offset pagination**: page number and page size with totals and page links
//! - **Cursor pagination**: descending-identifier walk with opaque `next`/`prev` cursors
//! - **Store contract**: [`Queryable`](store::Queryable), plus an in-memory JSON document store
//! - **HTTP endpoints** (feature `http`): axum router exposing both modes
//! - **Configuration**: figment layering of defaults, TOML files and `PAGEKIT_` env vars
//!
//! ## Example
//!
//! ```rust
//! use pagekit::prelude::*;
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = MemoryStore::from_json(json!([
//!     { "name": "Alice", "age": 30 },
//!     { "name": "Bob", "age": 25 },
//! ]))?;
//!
//! let options = OffsetOptions::new().with_sort("age", SortDirection::Ascending);
//! let page = offset::paginate(&store, &Filter::new(), &options).await?;
//! assert_eq!(page.results[0].get("name"), Some(&json!("Bob")));
//!
//! let page = cursor::paginate(&store, &Filter::new(), &CursorRequest::new(1)).await?;
//! assert!(page.has_next);
//! # Ok::<(), Error>(())
//! # }).unwrap();
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod observability;
pub mod offset;
pub mod seed;
pub mod store;

#[cfg(feature = "http")]
pub mod http;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, PaginationConfig, ServiceConfig};
    pub use crate::cursor::{self, CursorLinks, CursorPage, CursorRequest};
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::observability::init_tracing;
    pub use crate::offset::{self, OffsetLinks, OffsetOptions, OffsetPage, PageRef};
    pub use crate::seed::load_seed;
    pub use crate::store::{
        Document, DocumentId, Filter, FilterCondition, FilterOperator, FilterValue, MemoryStore,
        Queryable, Record, RecordId, Selection, SortDirection, SortSpec, StoreError,
        StoreErrorKind, StoreOperation, StoreResult, Window,
    };

    #[cfg(feature = "http")]
    pub use crate::http::{router, AppState, CursorQuery, OffsetQuery, Server};
}
