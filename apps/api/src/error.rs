//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Cashier API                        │
//! │                                                                         │
//! │  handler → Result<T, ApiError>                                          │
//! │                 │                                                       │
//! │   ValidationError / DbError::Validation ──► 400 VALIDATION_ERROR        │
//! │   DbError::NotFound / ProductNotFound   ──► 404 NOT_FOUND               │
//! │   CheckoutError::InsufficientStock      ──► 409 INSUFFICIENT_STOCK      │
//! │   everything else from the database     ──► 500 DATABASE_ERROR          │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │   { "code": "NOT_FOUND", "message": "Product not found: 42" }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Database failures are logged in full and answered with a generic
//! message.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cashier_core::ValidationError;
use cashier_db::{CheckoutError, DbError, ReportError};
use serde::Serialize;
use tracing::error;

/// API error returned from handlers.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for kecap (id 3): available 7, requested 20"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Not enough stock to fulfil a checkout line (409)
    InsufficientStock,

    /// Database operation failed (500)
    DatabaseError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InsufficientStock => StatusCode::CONFLICT,
            ErrorCode::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Logs the underlying failure and hides it from the client.
    fn persistence(err: &DbError) -> Self {
        error!(error = %err, "Database operation failed");
        Self::new(ErrorCode::DatabaseError, "A database error occurred")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::not_found(err.to_string()),
            DbError::Validation(inner) => inner.into(),
            DbError::UniqueViolation { .. } => ApiError::validation(err.to_string()),
            DbError::ForeignKeyViolation { .. } => {
                ApiError::validation("Referenced record does not exist")
            }
            DbError::CheckViolation { .. } => ApiError::validation(err.to_string()),
            other => ApiError::persistence(&other),
        }
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Validation(inner) => inner.into(),
            CheckoutError::ProductNotFound { .. } => ApiError::not_found(err.to_string()),
            CheckoutError::InsufficientStock { .. } => {
                ApiError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CheckoutError::Persistence(inner) => ApiError::persistence(&inner),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Validation(inner) => inner.into(),
            ReportError::Persistence(inner) => ApiError::persistence(&inner),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

/// Result type for handlers.
pub type AppResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serializes_screaming_snake_case() {
        let err = ApiError::new(ErrorCode::InsufficientStock, "out");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_STOCK");
        assert_eq!(json["message"], "out");
    }

    #[test]
    fn test_checkout_error_mapping() {
        let err: ApiError = CheckoutError::InsufficientStock {
            product_id: 3,
            product_name: "kecap".to_string(),
            available: 7,
            requested: 20,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.code.status(), StatusCode::CONFLICT);
        assert!(err.message.contains("available 7"));

        let err: ApiError = CheckoutError::ProductNotFound { product_id: 9 }.into();
        assert_eq!(err.code.status(), StatusCode::NOT_FOUND);

        let err: ApiError = CheckoutError::Validation(ValidationError::required("items")).into();
        assert_eq!(err.code.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_persistence_details_are_not_leaked() {
        let err: ApiError = DbError::QueryFailed("no such table: products".to_string()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("products"));

        let err: ApiError = ReportError::Persistence(DbError::PoolExhausted).into();
        assert_eq!(err.code.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_constraint_errors_are_client_errors() {
        let err: ApiError = DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err: ApiError = DbError::not_found("Category", 4).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
