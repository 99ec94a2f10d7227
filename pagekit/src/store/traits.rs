//! Store trait definitions
//!
//! [`Queryable`] is the only capability the paginators need from a data
//! store. It uses RPITIT (Return Position Impl Trait In Traits) so
//! implementations can be written with plain `async fn`.
//!
//! # Example
//!
//! ```rust,ignore
//! use pagekit::store::{Filter, Queryable, Selection, SortSpec, StoreResult, Window};
//!
//! struct EventStore {
//!     pool: PgPool,
//! }
//!
//! impl Queryable for EventStore {
//!     type Id = i64;
//!     type Record = Event;
//!
//!     async fn count_matching(&self, filter: &Filter) -> StoreResult<u64> {
//!         // SELECT count(*) FROM events WHERE ...
//!         todo!()
//!     }
//!
//!     async fn find_matching(
//!         &self,
//!         selection: Selection<'_, i64>,
//!         sort: &SortSpec,
//!         window: Window,
//!     ) -> StoreResult<Vec<Event>> {
//!         // SELECT * FROM events WHERE ... ORDER BY ... OFFSET ... LIMIT ...
//!         todo!()
//!     }
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use super::error::StoreError;
use super::query::{Filter, Selection, SortSpec, Window};

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A unique, totally ordered record identifier that round-trips through a
/// cursor string.
///
/// Implemented for every `Ord + Display + FromStr` type, so integers,
/// [`DocumentId`](super::DocumentId) and most key newtypes work as-is.
///
/// ```rust
/// use pagekit::store::RecordId;
///
/// assert_eq!(42_u64.to_cursor(), "42");
/// assert_eq!(u64::from_cursor("42"), Ok(42));
/// assert!(u64::from_cursor("forty-two").is_err());
/// ```
pub trait RecordId: Clone + Ord + fmt::Debug + Send + Sync + 'static {
    /// Serialize into a cursor string
    fn to_cursor(&self) -> String;

    /// Parse a cursor string, describing the failure on error
    fn from_cursor(cursor: &str) -> Result<Self, String>;
}

impl<T> RecordId for T
where
    T: Clone + Ord + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static,
    T::Err: fmt::Display,
{
    fn to_cursor(&self) -> String {
        self.to_string()
    }

    fn from_cursor(cursor: &str) -> Result<Self, String> {
        cursor.parse::<T>().map_err(|e| e.to_string())
    }
}

/// A stored document with a unique identifier
pub trait Record {
    /// Identifier type
    type Id: RecordId;

    /// This record's identifier
    fn id(&self) -> &Self::Id;
}

/// Count and ordered-range queries over a record collection
///
/// Implementations report failures as [`StoreError`]; callers of the
/// paginators receive those errors unchanged.
pub trait Queryable: Send + Sync {
    /// Identifier type shared by every record in the store
    type Id: RecordId;

    /// Record type returned by [`find_matching`](Queryable::find_matching)
    type Record: Record<Id = Self::Id> + Send;

    /// Count records matching `filter`
    fn count_matching(&self, filter: &Filter) -> impl Future<Output = StoreResult<u64>> + Send;

    /// Fetch matching records in `sort` order, restricted to `window`
    ///
    /// Records must satisfy every condition of `selection.filter` and, when
    /// `selection.id_before` is set, have an identifier strictly below it.
    fn find_matching(
        &self,
        selection: Selection<'_, Self::Id>,
        sort: &SortSpec,
        window: Window,
    ) -> impl Future<Output = StoreResult<Vec<Self::Record>>> + Send;
}
