//! # Validation Module
//!
//! Input validation for the cashier backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  ├── JSON shape (deserialization)                                      │
//! │  └── Query parameter pairing (start_date + end_date)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Checkout items: non-empty, positive ids and quantities            │
//! │  ├── Catalogue drafts: names, prices, stock                            │
//! │  └── Calendar dates: strict YYYY-MM-DD                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK (stock >= 0)                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cashier_core::validation::{validate_quantity, Validate};
//! use cashier_core::{CheckoutItem, CheckoutRequest};
//!
//! validate_quantity("quantity", 5).unwrap();
//!
//! let request = CheckoutRequest::new(vec![CheckoutItem { product_id: 1, quantity: 3 }]);
//! request.validate().unwrap();
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{CategoryDraft, CheckoutItem, CheckoutRequest, ProductDraft};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product or category name.
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted category description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

// =============================================================================
// Validate Trait
// =============================================================================

/// Types that can check themselves before reaching a store.
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

impl Validate for CheckoutRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_checkout_items(&self.items)
    }
}

impl Validate for ProductDraft {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        validate_price(self.price)?;
        validate_stock(self.stock)?;
        if let Some(category_id) = self.category_id {
            validate_id("category_id", category_id)?;
        }
        Ok(())
    }
}

impl Validate for CategoryDraft {
    fn validate(&self) -> ValidationResult<()> {
        validate_name("name", &self.name)?;
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LEN,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Checkout Validators
// =============================================================================

/// Validates every line of a checkout before the store is touched.
///
/// ## Rules
/// - At least one item
/// - Every `product_id` is positive
/// - Every `quantity` is positive
///
/// Errors name the offending line, e.g. `items[2].quantity`.
pub fn validate_checkout_items(items: &[CheckoutItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::required("items"));
    }

    for (index, item) in items.iter().enumerate() {
        validate_id(&format!("items[{index}].product_id"), item.product_id)?;
        validate_quantity(&format!("items[{index}].quantity"), item.quantity)?;
    }

    Ok(())
}

/// Validates a quantity.
///
/// ## Example
/// ```rust
/// use cashier_core::validation::validate_quantity;
///
/// assert!(validate_quantity("quantity", 1).is_ok());
/// assert!(validate_quantity("quantity", 0).is_err());
/// assert!(validate_quantity("quantity", -1).is_err());
/// ```
pub fn validate_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive(field));
    }
    Ok(())
}

/// Validates a row id.
pub fn validate_id(field: &str, id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::must_be_positive(field));
    }
    Ok(())
}

// =============================================================================
// Catalogue Validators
// =============================================================================

/// Validates a product or category name.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a unit price. Free products are not allowed.
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price <= 0 {
        return Err(ValidationError::must_be_positive("price"));
    }
    Ok(())
}

/// Validates a stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::Negative {
            field: "stock".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a strict `YYYY-MM-DD` calendar date.
///
/// chrono alone accepts `2026-2-1`; report parameters must be zero-padded,
/// so the shape is checked first.
///
/// ## Example
/// ```rust
/// use cashier_core::validation::parse_calendar_date;
///
/// assert!(parse_calendar_date("start_date", "2026-02-01").is_ok());
/// assert!(parse_calendar_date("start_date", "2026-2-1").is_err());
/// assert!(parse_calendar_date("start_date", "2026-02-30").is_err());
/// ```
pub fn parse_calendar_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        });
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("{value} is not a calendar date"),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
