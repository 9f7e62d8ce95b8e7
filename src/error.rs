//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the central error type of the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{DomainError, StoreError};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2002,
///     "message": "requested time slot overlaps an existing booking",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Service error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category             | HTTP Status                  |
/// |-----------|----------------------|------------------------------|
/// | 1000–1999 | Validation           | 400 Bad Request              |
/// | 2000–2999 | Not Found / Conflict | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server               | 500 Internal Server Error    |
/// | 4000–4999 | Auth                 | 401 Unauthorized / 403 Forbidden |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Failure raised by domain logic.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A referenced document does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Kind of document (`"arena"`, `"booking"`, ...).
        kind: &'static str,
        /// Requested identifier.
        id: uuid::Uuid,
    },

    /// The requested slot overlaps an active booking.
    #[error("requested time slot overlaps an existing booking")]
    BookingConflict,

    /// The user already reviewed this arena.
    #[error("you have already reviewed this arena")]
    DuplicateReview,

    /// Any other uniqueness or state conflict.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// Caller identity is missing or malformed.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Caller is not allowed to perform the action.
    #[error("forbidden: {0}")]
    Forbidden(String),
}

impl ApiError {
    /// Shorthand for [`ApiError::NotFound`].
    #[must_use]
    pub const fn not_found(kind: &'static str, id: uuid::Uuid) -> Self {
        Self::NotFound { kind, id }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Domain(err) => match err {
                DomainError::Validation(_) => 1001,
                DomainError::InvalidClockTime(_) => 1002,
                DomainError::EmptyTimeSlot { .. } => 1003,
                DomainError::RatingOutOfRange(_) => 1004,
                DomainError::DrawNotAllowed => 1005,
                DomainError::InvalidTransition { .. } => 2005,
            },
            Self::NotFound { .. } => 2001,
            Self::BookingConflict => 2002,
            Self::DuplicateReview => 2003,
            Self::Conflict(_) => 2004,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
            Self::Unauthenticated(_) => 4001,
            Self::Forbidden(_) => 4003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Domain(err) => {
                if err.is_state_conflict() {
                    StatusCode::CONFLICT
                } else {
                    StatusCode::BAD_REQUEST
                }
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BookingConflict | Self::DuplicateReview | Self::Conflict(_) => {
                StatusCode::CONFLICT
            }
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { kind, id } => Self::NotFound { kind, id },
            StoreError::Duplicate { .. } => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let details = match &self {
            Self::Domain(DomainError::InvalidTransition { from, .. }) => {
                Some(format!("current state: {from}"))
            }
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details,
            },
        };
        (status, axum::Json(body)).into_response()
    }
}
