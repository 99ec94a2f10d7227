//! HTTP endpoints over a [`Queryable`] store
//!
//! Two read-only routes expose the paginators:
//!
//! - `GET /records/cursor?cursor=&limit=&filter=` returns a [`CursorPage`]
//! - `GET /records/offset?page=&perPage=&sortField=&sortDirection=&filter=`
//!   returns an [`OffsetPage`]
//!
//! Failures are rendered through [`Error`]'s `IntoResponse` impl as
//! `{ error, code, status }` JSON.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pagekit::config::Config;
//! use pagekit::http::{self, Server};
//! use pagekit::store::MemoryStore;
//!
//! # async fn run() -> pagekit::Result<()> {
//! let config = Config::load()?;
//! let app = http::router(Arc::new(MemoryStore::new()), config.pagination);
//! Server::new(config).serve(app).await
//! # }
//! ```

mod query;
mod server;

pub use query::{CursorQuery, OffsetQuery};
pub use server::Server;

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::config::PaginationConfig;
use crate::cursor::{self, CursorPage};
use crate::error::{Error, Result};
use crate::offset::{self, OffsetPage};
use crate::store::Queryable;

/// Shared state for the pagination routes
pub struct AppState<S> {
    store: Arc<S>,
    pagination: PaginationConfig,
}

impl<S> AppState<S> {
    /// Create state over `store` with the given page size policy
    pub fn new(store: Arc<S>, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    /// The backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The page size policy
    pub fn pagination(&self) -> &PaginationConfig {
        &self.pagination
    }
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            pagination: self.pagination,
        }
    }
}

/// Build the router for `store`
pub fn router<S>(store: Arc<S>, pagination: PaginationConfig) -> Router
where
    S: Queryable + 'static,
    S::Record: Serialize,
{
    Router::new()
        .route("/records/cursor", get(cursor_page::<S>))
        .route("/records/offset", get(offset_page::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(store, pagination))
}

async fn cursor_page<S>(
    State(state): State<AppState<S>>,
    query: std::result::Result<Query<CursorQuery>, QueryRejection>,
) -> Result<Json<CursorPage<S::Record>>>
where
    S: Queryable + 'static,
    S::Record: Serialize,
{
    let Query(query) = query.map_err(|e| Error::InvalidPaginationParams(e.body_text()))?;
    let filter = query.filter()?;
    let request = query.to_request(state.pagination());

    let page = cursor::paginate(state.store(), &filter, &request).await?;
    Ok(Json(page))
}

async fn offset_page<S>(
    State(state): State<AppState<S>>,
    query: std::result::Result<Query<OffsetQuery>, QueryRejection>,
) -> Result<Json<OffsetPage<S::Record>>>
where
    S: Queryable + 'static,
    S::Record: Serialize,
{
    let Query(query) = query.map_err(|e| Error::InvalidPaginationParams(e.body_text()))?;
    let filter = query.filter()?;
    let options = query.to_options(state.pagination());

    let page = offset::paginate(state.store(), &filter, &options).await?;
    Ok(Json(page))
}
