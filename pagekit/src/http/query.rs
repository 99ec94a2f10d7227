//! Query-string parameters for the pagination endpoints

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::cursor::CursorRequest;
use crate::error::Result;
use crate::offset::{OffsetOptions, DEFAULT_PAGE};
use crate::store::{Filter, SortDirection};

/// Parameters for `GET /records/cursor`
///
/// ```rust
/// use pagekit::config::PaginationConfig;
/// use pagekit::http::CursorQuery;
///
/// let query = CursorQuery {
///     limit: Some(500),
///     ..Default::default()
/// };
/// let request = query.to_request(&PaginationConfig::default());
/// assert_eq!(request.page_size, 100);
/// assert!(request.cursor.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorQuery {
    /// Cursor from a previous page's `next`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,

    /// Page size; the configured default when absent
    #[serde(alias = "pageSize", skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Comma-separated `field:value` equality pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl CursorQuery {
    /// Build the paginator request, applying the page size policy
    #[must_use]
    pub fn to_request(&self, policy: &PaginationConfig) -> CursorRequest {
        CursorRequest {
            cursor: self.cursor.clone(),
            page_size: policy.resolve(self.limit),
        }
    }

    /// Parse the filter expression
    pub fn filter(&self) -> Result<Filter> {
        parse_filter(self.filter.as_deref())
    }
}

/// Parameters for `GET /records/offset`
///
/// `sortDirection` uses the numeric convention: `1` ascending, anything
/// else descending.
///
/// ```rust
/// use pagekit::config::PaginationConfig;
/// use pagekit::http::OffsetQuery;
/// use pagekit::store::SortDirection;
///
/// let query = OffsetQuery {
///     page: Some(3),
///     sort_field: Some("age".to_string()),
///     sort_direction: Some(-1),
///     ..Default::default()
/// };
/// let options = query.to_options(&PaginationConfig::default());
/// assert_eq!(options.page, 3);
/// assert_eq!(options.per_page, 10);
/// assert_eq!(options.sort_direction, SortDirection::Descending);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetQuery {
    /// 1-based page number; 1 when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    /// Page size; the configured default when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,

    /// Field to order by
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,

    /// `1` for ascending, anything else descending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_direction: Option<i64>,

    /// Comma-separated `field:value` equality pairs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl OffsetQuery {
    /// Build the paginator options, applying the page size policy
    #[must_use]
    pub fn to_options(&self, policy: &PaginationConfig) -> OffsetOptions {
        OffsetOptions {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            per_page: policy.resolve(self.per_page),
            sort_field: self.sort_field.clone(),
            sort_direction: self
                .sort_direction
                .map_or(SortDirection::Ascending, SortDirection::from_code),
        }
    }

    /// Parse the filter expression
    pub fn filter(&self) -> Result<Filter> {
        parse_filter(self.filter.as_deref())
    }
}

fn parse_filter(expression: Option<&str>) -> Result<Filter> {
    Ok(expression.unwrap_or_default().parse()?)
}
