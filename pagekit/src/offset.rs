//! Offset pagination
//!
//! Classic page-number pagination: count the matching records, then fetch
//! one skip/limit window in the requested sort order.
//!
//! # Example
//!
//! ```rust
//! use pagekit::offset::{self, OffsetOptions, PageRef};
//! use pagekit::store::{Filter, MemoryStore, SortDirection};
//! use serde_json::json;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = MemoryStore::from_json(json!([
//!     { "age": 30 }, { "age": 25 }, { "age": 35 }, { "age": 28 },
//! ]))
//! .unwrap();
//!
//! let options = OffsetOptions::new()
//!     .with_per_page(2)
//!     .with_sort("age", SortDirection::Ascending);
//! let page = offset::paginate(&store, &Filter::new(), &options).await.unwrap();
//!
//! assert_eq!(page.total, 4);
//! assert_eq!(page.total_pages, 2);
//! assert_eq!(page.pagination.next, Some(PageRef { page: 2, size: 2 }));
//! assert_eq!(page.pagination.prev, None);
//! # });
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{Filter, Queryable, Selection, SortDirection, SortSpec, Window};

/// Default page number
pub const DEFAULT_PAGE: u64 = 1;

/// Default number of records per page
pub const DEFAULT_PER_PAGE: u64 = 10;

/// Parameters for one offset-paginated fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetOptions {
    /// 1-based page number
    pub page: u64,
    /// Records per page
    pub per_page: u64,
    /// Field to order by; store order when `None` or empty
    pub sort_field: Option<String>,
    /// Order direction for `sort_field`
    #[serde(with = "direction_code")]
    pub sort_direction: SortDirection,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            sort_field: None,
            sort_direction: SortDirection::Ascending,
        }
    }
}

impl OffsetOptions {
    /// Options for page 1 with the default page size
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number
    #[must_use]
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    /// Set the page size
    #[must_use]
    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page;
        self
    }

    /// Order by `field` in `direction`
    #[must_use]
    pub fn with_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_field = Some(field.into());
        self.sort_direction = direction;
        self
    }

    /// The ordering this request asks the store for
    ///
    /// ```rust
    /// use pagekit::offset::OffsetOptions;
    /// use pagekit::store::{SortDirection, SortSpec};
    ///
    /// assert_eq!(OffsetOptions::new().sort_spec(), SortSpec::Natural);
    /// assert_eq!(
    ///     OffsetOptions::new().with_sort("", SortDirection::Descending).sort_spec(),
    ///     SortSpec::Natural
    /// );
    /// assert_eq!(
    ///     OffsetOptions::new().with_sort("age", SortDirection::Descending).sort_spec(),
    ///     SortSpec::field("age", SortDirection::Descending)
    /// );
    /// ```
    #[must_use]
    pub fn sort_spec(&self) -> SortSpec {
        match self.sort_field.as_deref() {
            Some(field) if !field.is_empty() => SortSpec::field(field, self.sort_direction),
            _ => SortSpec::Natural,
        }
    }

    /// Records skipped before this page
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPaginationParams`] when `page` or `per_page` is zero
    /// or the product overflows.
    pub fn skip(&self) -> Result<u64> {
        self.validate()?;
        (self.page - 1).checked_mul(self.per_page).ok_or_else(|| {
            Error::InvalidPaginationParams(format!(
                "page {} with {} per page is out of range",
                self.page, self.per_page
            ))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(Error::InvalidPaginationParams(
                "page must be at least 1".to_string(),
            ));
        }
        if self.per_page == 0 {
            return Err(Error::InvalidPaginationParams(
                "per page must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Direction as the numeric `1` / `-1` code used on the wire
mod direction_code {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::store::SortDirection;

    pub fn serialize<S: Serializer>(direction: &SortDirection, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(direction.code())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<SortDirection, D::Error> {
        i64::deserialize(d).map(SortDirection::from_code)
    }
}

/// A page reference used in navigation links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    /// 1-based page number
    pub page: u64,
    /// Number of records expected on that page
    pub size: u64,
}

/// Neighbouring pages, when they exist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetLinks {
    /// The following page; absent on the last page and beyond
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    /// The preceding page; absent on page 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

impl OffsetLinks {
    /// Compute links for `page` of `total_pages`.
    ///
    /// `next.size` is the number of records actually left for the next page,
    /// so it shrinks on the last page.
    ///
    /// ```rust
    /// use pagekit::offset::{OffsetLinks, PageRef};
    ///
    /// let links = OffsetLinks::compute(2, 4, 10, 3);
    /// assert_eq!(links.next, Some(PageRef { page: 3, size: 2 }));
    /// assert_eq!(links.prev, Some(PageRef { page: 1, size: 4 }));
    ///
    /// let past_end = OffsetLinks::compute(9, 4, 10, 3);
    /// assert_eq!(past_end.next, None);
    /// assert_eq!(past_end.prev, Some(PageRef { page: 8, size: 4 }));
    /// ```
    #[must_use]
    pub fn compute(page: u64, per_page: u64, total: u64, total_pages: u64) -> Self {
        let next = (page < total_pages).then(|| PageRef {
            page: page + 1,
            size: per_page.min(total.saturating_sub(page.saturating_mul(per_page))),
        });
        let prev = (page > 1).then(|| PageRef {
            page: page - 1,
            size: per_page,
        });
        Self { next, prev }
    }
}

/// One page of offset-paginated results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetPage<T> {
    /// Records on this page
    pub results: Vec<T>,
    /// Neighbouring pages
    pub pagination: OffsetLinks,
    /// Requested page number
    pub page: u64,
    /// Requested page size
    pub per_page: u64,
    /// Records matching the filter across all pages
    pub total: u64,
    /// `ceil(total / per_page)`
    pub total_pages: u64,
}

impl<T> OffsetPage<T> {
    /// Map the records to a different type, keeping counts and links
    pub fn map<U, F>(self, f: F) -> OffsetPage<U>
    where
        F: FnMut(T) -> U,
    {
        OffsetPage {
            results: self.results.into_iter().map(f).collect(),
            pagination: self.pagination,
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }

    /// Whether this is the last page that holds records
    pub fn is_last(&self) -> bool {
        self.pagination.next.is_none()
    }
}

/// Fetch one page by number.
///
/// Counts the matching records first and then fetches the window; the two
/// store calls run one after the other and are not atomic with respect to
/// concurrent writers.
///
/// # Errors
///
/// - [`Error::InvalidPaginationParams`] when `page` or `per_page` is zero,
///   before the store is called
/// - [`Error::Store`] carrying the store's own error, unchanged
pub async fn paginate<S>(
    store: &S,
    filter: &Filter,
    options: &OffsetOptions,
) -> Result<OffsetPage<S::Record>>
where
    S: Queryable + ?Sized,
{
    let skip = options.skip()?;
    let sort = options.sort_spec();

    let total = store.count_matching(filter).await?;
    let total_pages = total.div_ceil(options.per_page);

    let results = store
        .find_matching(
            Selection::new(filter),
            &sort,
            Window::new(skip, options.per_page),
        )
        .await?;

    tracing::debug!(
        page = options.page,
        per_page = options.per_page,
        sort = %sort,
        total,
        total_pages,
        returned = results.len(),
        "offset page fetched"
    );

    Ok(OffsetPage {
        results,
        pagination: OffsetLinks::compute(options.page, options.per_page, total, total_pages),
        page: options.page,
        per_page: options.per_page,
        total,
        total_pages,
    })
}
