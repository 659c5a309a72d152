//! # Ledger Store
//!
//! The storage seam used by checkout and reporting.
//!
//! ## Two Traits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LedgerStore                       (shared, Clone, Send + Sync)         │
//! │  ├── begin()                 ──► Scope                                  │
//! │  ├── transactions_in_window(w)   newest first, details attached        │
//! │  ├── summarize_window(w)         count, revenue, best seller           │
//! │  └── window_report(w)            both, from one read snapshot          │
//! │                                                                         │
//! │  CheckoutScope                     (one per checkout, owned)            │
//! │  ├── lock_product(id)        ──► Option<StockSnapshot>                  │
//! │  ├── decrement_stock(id, qty)                                          │
//! │  ├── insert_transaction(total) ──► TransactionHeader { id, created_at } │
//! │  ├── insert_detail(tx_id, line) ──► TransactionDetail                   │
//! │  └── commit(self)                                                      │
//! │                                                                         │
//! │  Dropping a scope without commit discards every write made through it. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Implementations
//! - [`SqliteLedger`] - `BEGIN IMMEDIATE` transaction on a pooled connection
//! - [`MemoryLedger`] - staged copy of in-process state behind a tokio mutex

use async_trait::async_trait;
use cashier_core::{
    AggregateReport, Money, PendingLine, ReportWindow, StockSnapshot, Transaction,
    TransactionDetail, WindowSummary,
};
use chrono::{DateTime, Utc};

use crate::error::DbResult;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryLedger;
pub use sqlite::SqliteLedger;

/// What the ledger assigns when a transaction header is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionHeader {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// Read access to the ledger plus the ability to open checkout scopes.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    type Scope: CheckoutScope;

    /// Opens an atomic scope holding the inventory write lock.
    async fn begin(&self) -> DbResult<Self::Scope>;

    /// Committed transactions with `created_at` in the window, newest first
    /// (ties by id descending), each with its details in insertion order.
    async fn transactions_in_window(&self, window: &ReportWindow) -> DbResult<Vec<Transaction>>;

    /// Count, revenue and best seller for the window.
    async fn summarize_window(&self, window: &ReportWindow) -> DbResult<WindowSummary>;

    /// Listing and summary read together, so the count always matches the
    /// listing even while checkouts commit.
    async fn window_report(&self, window: &ReportWindow) -> DbResult<AggregateReport>;
}

/// An open all-or-nothing unit of work.
#[async_trait]
pub trait CheckoutScope: Send + Sized {
    /// Reads a product under the scope's lock. `None` if it doesn't exist.
    async fn lock_product(&mut self, product_id: i64) -> DbResult<Option<StockSnapshot>>;

    /// Subtracts `quantity` from stock. Later reads in this scope see it.
    async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> DbResult<()>;

    /// Writes a transaction header and returns the assigned id and time.
    async fn insert_transaction(&mut self, total: Money) -> DbResult<TransactionHeader>;

    /// Writes one detail line under an inserted header.
    async fn insert_detail(
        &mut self,
        transaction_id: i64,
        line: &PendingLine,
    ) -> DbResult<TransactionDetail>;

    /// Makes every write in the scope visible at once.
    async fn commit(self) -> DbResult<()>;
}
