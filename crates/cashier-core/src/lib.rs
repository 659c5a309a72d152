//! # cashier-core: Pure Business Logic for the Cashier Backend
//!
//! This crate holds the domain types and every rule that can be decided
//! without touching the database.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashier Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │   /api/products  /api/categories  /api/checkout  /api/report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               cashier-db (ledger, checkout, reports)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cashier-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  report   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Window   │  │   rules   │  │   │
//! │  │   │Transaction│  │           │  │  Summary  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, Transaction, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//! - [`report`] - Report windows and in-process aggregation
//! - [`checkout`] - Per-line stock check and pricing under the checkout lock
//!
//! ## Example Usage
//!
//! ```rust
//! use cashier_core::money::Money;
//!
//! let unit_price = Money::from_minor(3500);
//! let subtotal = unit_price.checked_mul_quantity(3).unwrap();
//! assert_eq!(subtotal.minor(), 10500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use checkout::{CheckoutTally, PendingLine, StockSnapshot};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{ReportWindow, WindowSummary};
pub use types::*;
pub use validation::Validate;
