//! Error types and HTTP response conversion

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{FilterParseError, StoreError};

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by pagination calls and the surrounding service layers
#[derive(Debug, Error)]
pub enum Error {
    /// Failure reported by the store, passed through untouched
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Cursor could not be parsed into the store's identifier type
    #[error("Invalid cursor `{cursor}`: {reason}")]
    InvalidCursor {
        /// The cursor as received
        cursor: String,
        /// Why it failed to parse
        reason: String,
    },

    /// Page number or page size outside the accepted range
    #[error("Invalid pagination parameters: {0}")]
    InvalidPaginationParams(String),

    /// Malformed filter expression
    #[error("{0}")]
    InvalidFilter(#[from] FilterParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Seed data could not be loaded
    #[error("Seed error: {0}")]
    Seed(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build an [`Error::InvalidCursor`]
    pub fn invalid_cursor(cursor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCursor {
            cursor: cursor.into(),
            reason: reason.into(),
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

#[cfg(feature = "http")]
mod response {
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };

    use super::{Error, ErrorResponse};
    use crate::store::StoreErrorKind;

    impl ErrorResponse {
        /// Create error response with a code
        pub fn with_code(
            status: StatusCode,
            code: impl Into<String>,
            error: impl Into<String>,
        ) -> Self {
            Self {
                error: error.into(),
                code: Some(code.into()),
                status: status.as_u16(),
            }
        }
    }

    impl IntoResponse for Error {
        fn into_response(self) -> Response {
            let (status, body) = match self {
                Error::Store(ref e) => {
                    tracing::error!(
                        operation = %e.operation,
                        kind = %e.kind,
                        retriable = e.is_retriable(),
                        "Store error: {}", e.message
                    );

                    let status = match e.kind {
                        StoreErrorKind::Timeout => StatusCode::GATEWAY_TIMEOUT,
                        StoreErrorKind::ConnectionFailed => StatusCode::SERVICE_UNAVAILABLE,
                        _ => StatusCode::INTERNAL_SERVER_ERROR,
                    };
                    let code = format!("STORE_{}", e.kind.to_string().to_uppercase());
                    (status, ErrorResponse::with_code(status, code, "Store query failed"))
                }

                Error::InvalidCursor { .. } => (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_code(
                        StatusCode::BAD_REQUEST,
                        "INVALID_CURSOR",
                        self.to_string(),
                    ),
                ),

                Error::InvalidPaginationParams(_) => (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_code(
                        StatusCode::BAD_REQUEST,
                        "INVALID_PAGINATION",
                        self.to_string(),
                    ),
                ),

                Error::InvalidFilter(ref e) => (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_code(
                        StatusCode::BAD_REQUEST,
                        "INVALID_FILTER",
                        e.to_string(),
                    ),
                ),

                Error::Config(_) | Error::Seed(_) | Error::Io(_) => {
                    tracing::error!("Internal error: {}", self);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::with_code(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "INTERNAL_ERROR",
                            "Internal server error",
                        ),
                    )
                }
            };

            (status, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreErrorKind, StoreOperation};

    #[test]
    fn test_store_error_is_transparent() {
        let inner = StoreError::timeout(StoreOperation::Find, "slow");
        let err: Error = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        match err {
            Error::Store(e) => assert_eq!(e, inner),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_invalid_cursor_display() {
        let err = Error::invalid_cursor("zzz", "invalid character");
        assert_eq!(err.to_string(), "Invalid cursor `zzz`: invalid character");
    }

    #[test]
    fn test_invalid_params_display() {
        let err = Error::InvalidPaginationParams("page must be at least 1".to_string());
        assert!(err.to_string().contains("page must be at least 1"));
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_status_mapping() {
        use axum::{http::StatusCode, response::IntoResponse};

        let cases = [
            (Error::invalid_cursor("x", "bad"), StatusCode::BAD_REQUEST),
            (
                Error::InvalidPaginationParams("zero".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::InvalidFilter(FilterParseError("status".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                StoreError::timeout(StoreOperation::Count, "slow").into(),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                StoreError::connection_failed(StoreOperation::Find, "refused").into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                StoreError::new(StoreOperation::Find, StoreErrorKind::QueryFailed, "x").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (Error::Seed("bad".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
