//! # Error Types
//!
//! Domain-specific error types for cashier-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cashier-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations during checkout       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cashier-db errors (separate crate)                                    │
//! │  ├── DbError          - Database operation failures                    │
//! │  ├── CheckoutError    - CoreError | DbError                            │
//! │  └── ReportError      - ValidationError | DbError                      │
//! │                                                                         │
//! │  apps/api                                                              │
//! │  └── ApiError         - What HTTP clients see (code + message)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised while executing a checkout.
///
/// Every variant is terminal for the checkout that raised it: the atomic
/// scope is rolled back and nothing is retried.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A checkout item references a product id that does not exist.
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: i64 },

    /// Insufficient stock to complete the checkout.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout [{ product 1, qty 20 }]
    ///      │
    ///      ▼
    /// Lock product 1: stock=7
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 1, available: 7, requested: 20 }
    ///      │
    ///      ▼
    /// Whole checkout rolled back, client shows "Only 7 in stock"
    /// ```
    #[error(
        "Insufficient stock for {product_name} (id {product_id}): available {available}, requested {requested}"
    )]
    InsufficientStock {
        product_id: i64,
        product_name: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These are raised before any store access and are always caller-fixable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., malformed date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The end of a range does not come after its start.
    #[error("{end_field} must be after {start_field}")]
    OutOfOrder {
        start_field: String,
        end_field: String,
    },

    /// An amount computed from the input does not fit in 64 bits.
    #[error("{field} is too large")]
    Overflow { field: String },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates a MustBePositive error for the given field.
    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            product_id: 1,
            product_name: "Indomie Godog".to_string(),
            available: 7,
            requested: 20,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Indomie Godog (id 1): available 7, requested 20"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("items").to_string(), "items is required");
        assert_eq!(
            ValidationError::must_be_positive("items[0].quantity").to_string(),
            "items[0].quantity must be greater than 0"
        );

        let err = ValidationError::OutOfOrder {
            start_field: "start_date".to_string(),
            end_field: "end_date".to_string(),
        };
        assert_eq!(err.to_string(), "end_date must be after start_date");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("items").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
