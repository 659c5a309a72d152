//! # Domain Types
//!
//! Core domain types used throughout the cashier backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────────┐   │
//! │  │    Category     │◄──│    Product      │   │    Transaction      │   │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────────  │   │
//! │  │  id             │   │  id             │   │  id                 │   │
//! │  │  name           │   │  name, price    │   │  total_amount       │   │
//! │  │  description    │   │  stock          │   │  created_at         │   │
//! │  └─────────────────┘   │  category_id?   │   │  details[] ──────┐  │   │
//! │                        └─────────────────┘   └──────────────────┼──┘   │
//! │                                                                 ▼       │
//! │                                              ┌─────────────────────┐   │
//! │                                              │ TransactionDetail   │   │
//! │                                              │  product_id         │   │
//! │                                              │  product_name (snap)│   │
//! │                                              │  quantity, subtotal │   │
//! │                                              └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A transaction detail freezes the product's name at sale time. Later
//! renames, price changes or deletes never rewrite history, which is why
//! `product_id` on a detail is a plain number and not a live reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Input for creating or replacing a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name, copied into every detail line at sale time.
    pub name: String,

    /// Unit price in minor units.
    pub price: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    pub category_id: Option<i64>,

    /// Resolved through a join on reads; not stored on the product row.
    pub category_name: Option<String>,
}

/// Input for creating or replacing a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductDraft {
    pub name: String,
    pub price: i64,
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

// =============================================================================
// Checkout Input
// =============================================================================

/// A single line of a checkout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutItem {
    pub product_id: i64,
    pub quantity: i64,
}

/// A checkout request: an ordered list of items.
///
/// The same product may appear more than once; each occurrence is its own
/// detail line and all occurrences draw from the same stock.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
}

impl CheckoutRequest {
    pub fn new(items: Vec<CheckoutItem>) -> Self {
        Self { items }
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A completed sale.
///
/// Immutable once committed: there is no update or void path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: i64,

    /// Sum of all detail subtotals, in minor units.
    pub total_amount: i64,

    /// Assigned by the store at commit time.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// Detail lines in request order.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub details: Vec<TransactionDetail>,
}

impl Transaction {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_minor(self.total_amount)
    }
}

/// One line of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct TransactionDetail {
    pub id: i64,
    pub transaction_id: i64,
    pub product_id: i64,

    /// Product name at the time of sale.
    pub product_name: String,

    pub quantity: i64,

    /// `unit price × quantity` at the time of sale, in minor units.
    pub subtotal: i64,
}

// =============================================================================
// Reports
// =============================================================================

/// The product with the highest quantity sold in a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BestSellingProduct {
    pub id: i64,
    pub name: String,
    pub total_sold: i64,
}

/// Everything that happened in a report window.
///
/// ## Consistency
/// `total_transactions == transactions.len()` and `total_revenue` equals the
/// sum of every listed transaction's `total_amount`. The listing is newest
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AggregateReport {
    pub transactions: Vec<Transaction>,
    pub total_transactions: i64,
    pub total_revenue: i64,
    pub best_selling_product: Option<BestSellingProduct>,
}

impl AggregateReport {
    /// An empty report: no transactions, zero revenue, no best seller.
    pub fn empty() -> Self {
        Self {
            transactions: Vec::new(),
            total_transactions: 0,
            total_revenue: 0,
            best_selling_product: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn indomie() -> Product {
        Product {
            id: 1,
            name: "Indomie Godog".to_string(),
            price: 3500,
            stock: 10,
            category_id: Some(1),
            category_name: Some("Makanan".to_string()),
        }
    }

    #[test]
    fn test_product_json_shape() {
        let json = serde_json::to_value(indomie()).unwrap();
        assert_eq!(json["price"], 3500);
        assert_eq!(json["stock"], 10);
        assert_eq!(json["category_name"], "Makanan");
    }

    #[test]
    fn test_transaction_json_shape() {
        let tx = Transaction {
            id: 7,
            total_amount: 10500,
            created_at: DateTime::parse_from_rfc3339("2026-02-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            details: vec![TransactionDetail {
                id: 1,
                transaction_id: 7,
                product_id: 1,
                product_name: "Indomie Godog".to_string(),
                quantity: 3,
                subtotal: 10500,
            }],
        };

        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["total_amount"], 10500);
        assert_eq!(json["details"][0]["product_name"], "Indomie Godog");
        assert_eq!(json["details"][0]["transaction_id"], 7);
    }

    #[test]
    fn test_category_draft_description_defaults() {
        let draft: CategoryDraft = serde_json::from_str(r#"{"name":"Minuman"}"#).unwrap();
        assert_eq!(draft.name, "Minuman");
        assert!(draft.description.is_empty());
    }

    #[test]
    fn test_empty_report() {
        let report = AggregateReport::empty();
        assert_eq!(report.total_transactions, 0);
        assert_eq!(report.total_revenue, 0);
        assert!(report.best_selling_product.is_none());
        assert!(report.transactions.is_empty());
    }
}
