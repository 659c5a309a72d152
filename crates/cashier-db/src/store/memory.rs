//! # In-Memory Ledger
//!
//! A [`LedgerStore`] that keeps products and transactions in process.
//!
//! Used by tests that exercise checkout and reporting without SQLite, and
//! honouring the same contract: a scope holds the only lock on the state,
//! works on a staged copy, and publishes it on commit. Dropping the scope
//! throws the copy away.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use cashier_core::report::{sort_newest_first, summarize};
use cashier_core::{
    AggregateReport, Money, PendingLine, ReportWindow, StockSnapshot, Transaction,
    TransactionDetail, WindowSummary,
};
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use super::{CheckoutScope, LedgerStore, TransactionHeader};
use crate::error::{DbError, DbResult};

#[derive(Debug, Clone, Default)]
struct LedgerState {
    products: BTreeMap<i64, StockSnapshot>,
    transactions: Vec<Transaction>,
    last_transaction_id: i64,
    last_detail_id: i64,
}

impl LedgerState {
    fn in_window(&self, window: &ReportWindow) -> Vec<Transaction> {
        let mut matching: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| window.contains(t.created_at))
            .cloned()
            .collect();
        sort_newest_first(&mut matching);
        matching
    }
}

// =============================================================================
// Ledger
// =============================================================================

/// Ledger store kept entirely in memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a product.
    pub async fn put_product(&self, id: i64, name: &str, price: i64, stock: i64) {
        let product = StockSnapshot {
            id,
            name: name.to_string(),
            price: Money::from_minor(price),
            stock,
        };
        self.state.lock().await.products.insert(id, product);
    }

    /// Current stock of a product, if it exists.
    pub async fn stock_of(&self, id: i64) -> Option<i64> {
        self.state.lock().await.products.get(&id).map(|p| p.stock)
    }

    /// Number of committed transactions, regardless of time.
    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    type Scope = MemoryScope;

    async fn begin(&self) -> DbResult<MemoryScope> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        debug!("Memory checkout scope opened");
        Ok(MemoryScope { guard, staged })
    }

    async fn transactions_in_window(&self, window: &ReportWindow) -> DbResult<Vec<Transaction>> {
        Ok(self.state.lock().await.in_window(window))
    }

    async fn summarize_window(&self, window: &ReportWindow) -> DbResult<WindowSummary> {
        let matching = self.state.lock().await.in_window(window);
        summarize(&matching).map_err(DbError::from)
    }

    async fn window_report(&self, window: &ReportWindow) -> DbResult<AggregateReport> {
        let matching = self.state.lock().await.in_window(window);
        let summary = summarize(&matching)?;
        Ok(summary.into_report(matching))
    }
}

// =============================================================================
// Scope
// =============================================================================

/// Exclusive access to the ledger state plus the writes staged so far.
pub struct MemoryScope {
    guard: OwnedMutexGuard<LedgerState>,
    staged: LedgerState,
}

#[async_trait]
impl CheckoutScope for MemoryScope {
    async fn lock_product(&mut self, product_id: i64) -> DbResult<Option<StockSnapshot>> {
        Ok(self.staged.products.get(&product_id).cloned())
    }

    async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> DbResult<()> {
        let product = self
            .staged
            .products
            .get_mut(&product_id)
            .ok_or_else(|| DbError::not_found("Product", product_id))?;

        if product.stock < quantity {
            return Err(DbError::CheckViolation {
                message: format!("stock of product {product_id} would go negative"),
            });
        }

        product.stock -= quantity;
        Ok(())
    }

    async fn insert_transaction(&mut self, total: Money) -> DbResult<TransactionHeader> {
        self.staged.last_transaction_id += 1;
        let header = TransactionHeader {
            id: self.staged.last_transaction_id,
            created_at: Utc::now(),
        };

        self.staged.transactions.push(Transaction {
            id: header.id,
            total_amount: total.minor(),
            created_at: header.created_at,
            details: Vec::new(),
        });

        Ok(header)
    }

    async fn insert_detail(
        &mut self,
        transaction_id: i64,
        line: &PendingLine,
    ) -> DbResult<TransactionDetail> {
        self.staged.last_detail_id += 1;
        let detail = TransactionDetail {
            id: self.staged.last_detail_id,
            transaction_id,
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            subtotal: line.subtotal.minor(),
        };

        let transaction = self
            .staged
            .transactions
            .iter_mut()
            .rev()
            .find(|t| t.id == transaction_id)
            .ok_or_else(|| DbError::ForeignKeyViolation {
                message: format!("transaction {transaction_id} does not exist"),
            })?;
        transaction.details.push(detail.clone());

        Ok(detail)
    }

    async fn commit(self) -> DbResult<()> {
        let MemoryScope { mut guard, staged } = self;
        *guard = staged;
        debug!("Memory checkout scope committed");
        Ok(())
    }
}
