//! Cursor pagination
//!
//! Pages walk a collection from the highest identifier down. A cursor is the
//! serialized identifier of the last record on the previous page; the next
//! page holds records whose identifier is strictly below it.
//!
//! `prev` on a page is simply the cursor that produced it, so following
//! `prev` steps back by exactly one request, not to the page before that.
//!
//! # Example
//!
//! ```rust
//! use pagekit::cursor::{self, CursorRequest};
//! use pagekit::store::{Filter, MemoryStore};
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = MemoryStore::from_json(json!([{ "n": 1 }, { "n": 2 }, { "n": 3 }])).unwrap();
//! let filter = Filter::new();
//!
//! let first = cursor::paginate(&store, &filter, &CursorRequest::new(2)).await.unwrap();
//! assert_eq!(first.results.len(), 2);
//! assert!(first.has_next);
//!
//! let request = CursorRequest::new(2).with_cursor(first.pagination.next.clone().unwrap());
//! let second = cursor::paginate(&store, &filter, &request).await.unwrap();
//! assert_eq!(second.results.len(), 1);
//! assert!(!second.has_next);
//! assert_eq!(second.pagination.prev, first.pagination.next);
//! # });
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{Filter, Queryable, Record, RecordId, Selection, SortSpec, Window};

/// Page size used when a request does not name one
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Parameters for one cursor-paginated fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorRequest {
    /// Cursor from a previous page's `next`; `None` or empty starts from the top
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    /// Maximum number of records to return
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for CursorRequest {
    fn default() -> Self {
        Self {
            cursor: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CursorRequest {
    /// First page with the given size
    #[must_use]
    pub fn new(page_size: u64) -> Self {
        Self {
            cursor: None,
            page_size,
        }
    }

    /// Continue after `cursor`
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// The cursor if one was given and it is not empty
    #[must_use]
    pub fn effective_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Navigation cursors for a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorLinks {
    /// Cursor for the following page; present only when `has_next`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// The cursor that produced this page, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// One page of cursor-paginated results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPage<T> {
    /// Records in descending identifier order
    pub results: Vec<T>,
    /// Navigation cursors
    pub pagination: CursorLinks,
    /// Whether more records exist past this page
    pub has_next: bool,
}

impl<T> CursorPage<T> {
    /// Map the records to a different type, keeping navigation intact
    pub fn map<U, F>(self, f: F) -> CursorPage<U>
    where
        F: FnMut(T) -> U,
    {
        CursorPage {
            results: self.results.into_iter().map(f).collect(),
            pagination: self.pagination,
            has_next: self.has_next,
        }
    }
}

/// Fetch the page that follows `request.cursor`.
///
/// Asks the store for `page_size + 1` records below the cursor, newest
/// first; the extra record only signals that another page exists and is
/// dropped before `next` is computed.
///
/// # Errors
///
/// - [`Error::InvalidPaginationParams`] when `page_size` is zero
/// - [`Error::InvalidCursor`] when the cursor does not parse as the store's
///   identifier type
/// - [`Error::Store`] carrying the store's own error, unchanged
///
/// Neither validation failure touches the store.
pub async fn paginate<S>(
    store: &S,
    filter: &Filter,
    request: &CursorRequest,
) -> Result<CursorPage<S::Record>>
where
    S: Queryable + ?Sized,
{
    if request.page_size == 0 {
        return Err(Error::InvalidPaginationParams(
            "page size must be at least 1".to_string(),
        ));
    }

    let cursor = request.effective_cursor();
    let id_before = cursor
        .map(|c| S::Id::from_cursor(c).map_err(|reason| Error::invalid_cursor(c, reason)))
        .transpose()?;

    let fetch_limit = request.page_size.checked_add(1).ok_or_else(|| {
        Error::InvalidPaginationParams(format!("page size {} is too large", request.page_size))
    })?;

    let selection = Selection::new(filter).before(id_before.as_ref());
    let mut results = store
        .find_matching(selection, &SortSpec::IdDescending, Window::first(fetch_limit))
        .await?;

    let has_next = results.len() as u64 > request.page_size;
    if has_next {
        results.truncate(request.page_size as usize);
    }

    let next = if has_next {
        results.last().map(|record| record.id().to_cursor())
    } else {
        None
    };

    tracing::debug!(
        page_size = request.page_size,
        cursor = cursor.unwrap_or(""),
        returned = results.len(),
        has_next,
        "cursor page fetched"
    );

    Ok(CursorPage {
        results,
        pagination: CursorLinks {
            next,
            prev: cursor.map(str::to_string),
        },
        has_next,
    })
}
