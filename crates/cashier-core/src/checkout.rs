//! # Checkout Math
//!
//! The per-line decision a checkout makes once a product row is locked:
//! enough stock or not, and what the line costs.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cashier-db (atomic scope open)                                         │
//! │                                                                         │
//! │   lock_product(id) ──► StockSnapshot { name, price, stock }             │
//! │                              │                                          │
//! │                              ▼                                          │
//! │   ┌───────────────────────────────────────────────────┐                │
//! │   │ CheckoutTally::add_line (THIS MODULE, no I/O)     │                │
//! │   │   stock < qty      → InsufficientStock            │                │
//! │   │   price × qty      → subtotal (checked)           │                │
//! │   │   total += subtotal (checked)                     │                │
//! │   │   PendingLine { name snapshot, qty, subtotal }    │                │
//! │   └───────────────────────────────────────────────────┘                │
//! │                              │                                          │
//! │                              ▼                                          │
//! │   decrement_stock(id, qty), then insert header + details, commit       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::CheckoutItem;

/// A product row as read under the checkout lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSnapshot {
    pub id: i64,
    pub name: String,
    pub price: Money,
    pub stock: i64,
}

/// A detail line waiting for its transaction id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLine {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub subtotal: Money,
}

/// Running state of a checkout: accepted lines and their total.
#[derive(Debug, Clone, Default)]
pub struct CheckoutTally {
    lines: Vec<PendingLine>,
    total: Money,
}

impl CheckoutTally {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity),
            total: Money::zero(),
        }
    }

    /// Accepts one request line against a freshly locked product.
    ///
    /// `index` is the line's position in the request, used in error fields.
    /// On success the caller must decrement stock by `item.quantity`.
    pub fn add_line(
        &mut self,
        index: usize,
        product: &StockSnapshot,
        item: &CheckoutItem,
    ) -> CoreResult<&PendingLine> {
        if product.stock < item.quantity {
            return Err(CoreError::InsufficientStock {
                product_id: product.id,
                product_name: product.name.clone(),
                available: product.stock,
                requested: item.quantity,
            });
        }

        let subtotal = product
            .price
            .checked_mul_quantity(item.quantity)
            .ok_or_else(|| ValidationError::Overflow {
                field: format!("items[{index}].subtotal"),
            })?;

        self.total = self
            .total
            .checked_add(subtotal)
            .ok_or_else(|| ValidationError::Overflow {
                field: "total_amount".to_string(),
            })?;

        self.lines.push(PendingLine {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: item.quantity,
            subtotal,
        });

        Ok(&self.lines[self.lines.len() - 1])
    }

    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    #[inline]
    pub fn lines(&self) -> &[PendingLine] {
        &self.lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
