//! # Database Error Types
//!
//! Error types for database operations and the services built on them.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where errors go                                      │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError ← Adds context and categorization                             │
//! │       │                                                                 │
//! │       ├──► CheckoutError::Persistence   (with CoreError rejections)    │
//! │       └──► ReportError::Persistence     (Validation lifts out)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (apps/api) ← code + message, mapped to an HTTP status        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashier_core::{CoreError, ValidationError};
use thiserror::Error;

/// Failures from the pool, the repositories and the ledger store.
///
/// Constraint failures are split out so the API can answer them as client
/// errors; everything else is a server-side fault.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row with that id, or an update/delete matched nothing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// e.g. a product pointing at a category that does not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// CHECK constraint violation (e.g. `stock >= 0`).
    #[error("Constraint violation: {message}")]
    CheckViolation { message: String },

    /// Input rejected before any SQL ran.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The pool could not open (bad path, permissions) or is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Any other statement-level SQLite error.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// The checkout scope could not proceed:
    /// - BEGIN IMMEDIATE could not get the write lock within the busy timeout
    /// - A write inside a checkout scope did not touch the expected row
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// `NotFound` for `entity` with the given id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// Classifies sqlx errors.
///
/// ```text
/// RowNotFound                   → NotFound
/// Database("UNIQUE ...")        → UniqueViolation
/// Database("FOREIGN KEY ...")   → ForeignKeyViolation
/// Database("CHECK ...")         → CheckViolation
/// Database("database is locked")→ TransactionFailed
/// Database(other)               → QueryFailed
/// PoolTimedOut                  → PoolExhausted
/// PoolClosed                    → ConnectionFailed
/// anything else                 → Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                // "CHECK constraint failed: <expr>"
                if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
                    DbError::UniqueViolation {
                        field: field.to_string(),
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("CHECK constraint failed") {
                    DbError::CheckViolation {
                        message: msg.to_string(),
                    }
                } else if msg.contains("database is locked") {
                    DbError::TransactionFailed(msg.to_string())
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Checkout Error
// =============================================================================

/// Why a checkout did not commit.
///
/// Everything except `Persistence` is the caller's fault and leaves the
/// store exactly as it was.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: i64 },

    #[error(
        "Insufficient stock for {product_name} (id {product_id}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: i64,
        product_name: String,
        available: i64,
        requested: i64,
    },

    #[error("Persistence failure: {0}")]
    Persistence(#[from] DbError),
}

impl From<CoreError> for CheckoutError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound { product_id } => CheckoutError::ProductNotFound { product_id },
            CoreError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            } => CheckoutError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            },
            CoreError::Validation(err) => CheckoutError::Validation(err),
        }
    }
}

impl CheckoutError {
    /// True for rejections caused by the request or current stock.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, CheckoutError::Persistence(_))
    }
}

// =============================================================================
// Report Error
// =============================================================================

/// Why a report could not be produced. An empty window is not an error.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Persistence failure: {0}")]
    Persistence(DbError),
}

impl From<DbError> for ReportError {
    fn from(err: DbError) -> Self {
        match err {
            // Aggregation overflow surfaces like any other validation failure.
            DbError::Validation(inner) => ReportError::Validation(inner),
            other => ReportError::Persistence(other),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
