//! Store error types
//!
//! Failures raised by a [`Queryable`](super::Queryable) collaborator. The
//! paginators never retry or rewrap these; they reach the caller exactly as
//! the store produced them.
//!
//! # Example
//!
//! ```rust
//! use pagekit::store::{StoreError, StoreErrorKind, StoreOperation};
//!
//! let error = StoreError::timeout(StoreOperation::Find, "query exceeded 5s");
//! assert_eq!(error.kind, StoreErrorKind::Timeout);
//! assert!(error.is_retriable());
//! ```

use std::fmt;

/// Store call that was in flight when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// Counting records matching a filter
    Count,
    /// Fetching an ordered window of matching records
    Find,
    /// Adding records to the store
    Insert,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count => write!(f, "count"),
            Self::Find => write!(f, "find"),
            Self::Insert => write!(f, "insert"),
        }
    }
}

/// Category of store error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    /// Could not reach the backing store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// The store rejected or failed to execute the query
    QueryFailed,
    /// A record could not be encoded or decoded
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::QueryFailed => write!(f, "query_failed"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured store error with operation context
///
/// ```rust
/// use pagekit::store::{StoreError, StoreOperation};
///
/// let error = StoreError::query_failed(StoreOperation::Count, "unknown field `age`");
/// assert_eq!(
///     error.to_string(),
///     "Store query_failed error during count: unknown field `age`"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    /// The store call being performed
    pub operation: StoreOperation,
    /// The category of error
    pub kind: StoreErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl StoreError {
    /// Create a new store error
    pub fn new(
        operation: StoreOperation,
        kind: StoreErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::ConnectionFailed, message)
    }

    /// Create a timeout error
    pub fn timeout(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::Timeout, message)
    }

    /// Create a query failure error
    pub fn query_failed(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::QueryFailed, message)
    }

    /// Create a serialization error
    pub fn serialization_error(operation: StoreOperation, message: impl Into<String>) -> Self {
        Self::new(operation, StoreErrorKind::SerializationError, message)
    }

    /// Whether a caller could reasonably retry the operation.
    ///
    /// The paginators themselves never retry; this is advisory for callers.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            StoreErrorKind::ConnectionFailed | StoreErrorKind::Timeout
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Store {} error during {}: {}",
            self.kind, self.operation, self.message
        )
    }
}

impl std::error::Error for StoreError {}
