//! # Checkout Service
//!
//! Turns a validated checkout request into one committed transaction, or
//! into nothing at all.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/checkout  [{1, 3}, {2, 1}]                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate (non-empty, ids > 0, quantities > 0)  ── fail → Validation    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.begin()  ─────────────────────── write lock held from here ──┐   │
//! │       │                                                             │   │
//! │       ▼  for each item, in request order                            │   │
//! │  lock_product ── None → ProductNotFound                              │   │
//! │  tally.add_line ── short → InsufficientStock                         │   │
//! │  decrement_stock                                                     │   │
//! │       │                                                             │   │
//! │       ▼                                                             │   │
//! │  insert_transaction(total) → id, created_at                          │   │
//! │  insert_detail × N                                                   │   │
//! │  commit ──────────────────────────────────────────── lock released ─┘   │
//! │                                                                         │
//! │  Any early return drops the scope: every write above is undone.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cashier_core::{CheckoutRequest, CheckoutTally, CoreError, Transaction, Validate};
use tracing::{debug, error, info, warn};

use crate::error::CheckoutError;
use crate::store::{CheckoutScope, LedgerStore};

/// Executes checkouts against a ledger store.
#[derive(Debug, Clone)]
pub struct CheckoutService<S> {
    store: S,
}

impl<S: LedgerStore> CheckoutService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Runs one checkout atomically.
    ///
    /// ## Returns
    /// * `Ok(Transaction)` - committed, with ids, timestamp and details
    /// * `Err(CheckoutError)` - nothing was written
    pub async fn checkout(&self, request: &CheckoutRequest) -> Result<Transaction, CheckoutError> {
        let result = self.execute(request).await;

        match &result {
            Ok(transaction) => info!(
                transaction_id = transaction.id,
                total_amount = transaction.total_amount,
                lines = transaction.details.len(),
                "Checkout committed"
            ),
            Err(err) if err.is_rejection() => warn!(error = %err, "Checkout rejected"),
            Err(err) => error!(error = %err, "Checkout failed"),
        }

        result
    }

    async fn execute(&self, request: &CheckoutRequest) -> Result<Transaction, CheckoutError> {
        request.validate()?;

        let mut scope = self.store.begin().await?;
        let mut tally = CheckoutTally::with_capacity(request.items.len());

        for (index, item) in request.items.iter().enumerate() {
            let product = scope
                .lock_product(item.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound {
                    product_id: item.product_id,
                })?;

            let line = tally.add_line(index, &product, item)?;
            debug!(
                product_id = line.product_id,
                quantity = line.quantity,
                subtotal = %line.subtotal,
                "Line accepted"
            );

            scope.decrement_stock(item.product_id, item.quantity).await?;
        }

        let header = scope.insert_transaction(tally.total()).await?;

        let mut details = Vec::with_capacity(tally.lines().len());
        for line in tally.lines() {
            details.push(scope.insert_detail(header.id, line).await?);
        }

        scope.commit().await?;

        Ok(Transaction {
            id: header.id,
            total_amount: tally.total().minor(),
            created_at: header.created_at,
            details,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use cashier_core::{CheckoutItem, ValidationError};

    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::store::{MemoryLedger, SqliteLedger};

    fn request(items: &[(i64, i64)]) -> CheckoutRequest {
        CheckoutRequest::new(
            items
                .iter()
                .map(|&(product_id, quantity)| CheckoutItem {
                    product_id,
                    quantity,
                })
                .collect(),
        )
    }

    async fn sqlite_with_catalogue() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query(
            "INSERT INTO products (id, name, price, stock) VALUES \
             (1, 'Indomie Godog', 3500, 10), \
             (2, 'Vit 1000ml', 3000, 40), \
             (3, 'Kecap', 12000, 20)",
        )
        .execute(db.pool())
        .await
        .unwrap();
        db
    }

    async fn memory_with_catalogue() -> MemoryLedger {
        let ledger = MemoryLedger::new();
        ledger.put_product(1, "Indomie Godog", 3500, 10).await;
        ledger.put_product(2, "Vit 1000ml", 3000, 40).await;
        ledger.put_product(3, "Kecap", 12000, 20).await;
        ledger
    }

    async fn sqlite_stock(db: &Database, id: i64) -> i64 {
        db.products().get(id).await.unwrap().stock
    }

    async fn sqlite_transaction_count(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }


    async fn yield_times(n: usize) {
        for _ in 0..n {
            tokio::task::yield_now().await;
        }
    }

    /// Drives a checkout for a bounded number of scheduler turns, then drops
    /// it if it has not finished. Returns whether it completed.
    async fn checkout_abandoned_after<S: LedgerStore>(
        service: &CheckoutService<S>,
        items: &[(i64, i64)],
        turns: usize,
    ) -> bool {
        let request = request(items);
        let checkout = service.checkout(&request);
        tokio::pin!(checkout);

        tokio::select! {
            biased;
            result = &mut checkout => {
                if let Err(err) = result {
                    panic!("checkout after {turns} turns failed: {err:?}");
                }
                true
            }
            _ = yield_times(turns) => false,
        }
    }

    /// Stock left plus units recorded as sold equals what was stocked.
    async fn assert_sqlite_units_conserved(db: &Database, product_id: i64, stocked: i64) {
        let sold: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM transaction_details WHERE product_id = ?",
        )
        .bind(product_id)
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert_eq!(sqlite_stock(db, product_id).await + sold, stocked);
    }

    async fn assert_abandoned_checkouts_leave_ledger_usable(db: Database) {
        sqlx::query(
            "INSERT INTO products (id, name, price, stock) VALUES \
             (1, 'Indomie Godog', 3500, 100), \
             (2, 'Vit 1000ml', 3000, 100)",
        )
        .execute(db.pool())
        .await
        .unwrap();
        let service = CheckoutService::new(db.ledger());

        for turns in 0..16 {
            checkout_abandoned_after(&service, &[(1, 1), (2, 2)], turns).await;
            assert_sqlite_units_conserved(&db, 1, 100).await;
            assert_sqlite_units_conserved(&db, 2, 100).await;
        }

        let tx = service.checkout(&request(&[(1, 1), (2, 2)])).await.unwrap();
        assert_eq!(tx.total_amount, 3500 + 6000);
        assert_sqlite_units_conserved(&db, 1, 100).await;
        assert_sqlite_units_conserved(&db, 2, 100).await;
    }

    // -------------------------------------------------------------------------
    // SQLite ledger
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_single_item_checkout() {
        let db = sqlite_with_catalogue().await;
        let service = CheckoutService::new(db.ledger());

        let tx = service.checkout(&request(&[(1, 3)])).await.unwrap();

        assert_eq!(tx.total_amount, 10500);
        assert_eq!(tx.details.len(), 1);
        assert_eq!(tx.details[0].product_name, "Indomie Godog");
        assert_eq!(tx.details[0].quantity, 3);
        assert_eq!(tx.details[0].subtotal, 10500);
        assert_eq!(tx.details[0].transaction_id, tx.id);
        assert_eq!(sqlite_stock(&db, 1).await, 7);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_everything() {
        let db = sqlite_with_catalogue().await;
        let service = CheckoutService::new(db.ledger());
        service.checkout(&request(&[(1, 3)])).await.unwrap();

        // First line would succeed on its own; the second one fails.
        let err = service
            .checkout(&request(&[(2, 5), (1, 20)]))
            .await
            .unwrap_err();

        match err {
            CheckoutError::InsufficientStock {
                product_id,
                product_name,
                available,
                requested,
            } => {
                assert_eq!(product_id, 1);
                assert_eq!(product_name, "Indomie Godog");
                assert_eq!(available, 7);
                assert_eq!(requested, 20);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(sqlite_stock(&db, 1).await, 7);
        assert_eq!(sqlite_stock(&db, 2).await, 40);
        assert_eq!(sqlite_transaction_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_unknown_product_rolls_back() {
        let db = sqlite_with_catalogue().await;
        let service = CheckoutService::new(db.ledger());

        let err = service
            .checkout(&request(&[(1, 1), (999, 1)]))
            .await
            .unwrap_err();

        assert!(matches!(err, CheckoutError::ProductNotFound { product_id: 999 }));
        assert_eq!(sqlite_stock(&db, 1).await, 10);
        assert_eq!(sqlite_transaction_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_validation_happens_before_store_access() {
        let db = sqlite_with_catalogue().await;
        let service = CheckoutService::new(db.ledger());

        let err = service.checkout(&request(&[])).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Validation(ValidationError::Required { .. })));

        let err = service
            .checkout(&request(&[(1, 1), (2, 0)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::MustBePositive { ref field }) if field == "items[1].quantity"
        ));

        assert_eq!(sqlite_stock(&db, 1).await, 10);
    }

    #[tokio::test]
    async fn test_repeated_product_draws_from_same_stock() {
        let db = sqlite_with_catalogue().await;
        let service = CheckoutService::new(db.ledger());

        let tx = service
            .checkout(&request(&[(1, 6), (1, 4)]))
            .await
            .unwrap();
        assert_eq!(tx.details.len(), 2);
        assert_eq!(tx.total_amount, 35000);
        assert_eq!(sqlite_stock(&db, 1).await, 0);

        // A later line sees the earlier line's decrement.
        let db = sqlite_with_catalogue().await;
        let service = CheckoutService::new(db.ledger());
        let err = service
            .checkout(&request(&[(1, 6), (1, 5)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock { available: 4, requested: 5, .. }
        ));
        assert_eq!(sqlite_stock(&db, 1).await, 10);
    }

    #[tokio::test]
    async fn test_stock_is_conserved() {
        let db = sqlite_with_catalogue().await;
        let service = CheckoutService::new(db.ledger());

        service.checkout(&request(&[(1, 2), (3, 1)])).await.unwrap();
        service.checkout(&request(&[(1, 1), (2, 10)])).await.unwrap();
        let _ = service.checkout(&request(&[(3, 100)])).await.unwrap_err();

        for (id, initial) in [(1, 10), (2, 40), (3, 20)] {
            let sold: i64 = sqlx::query_scalar(
                "SELECT COALESCE(SUM(quantity), 0) FROM transaction_details WHERE product_id = ?",
            )
            .bind(id)
            .fetch_one(db.pool())
            .await
            .unwrap();
            assert_eq!(initial, sqlite_stock(&db, id).await + sold, "product {id}");
        }
    }

    #[tokio::test]
    async fn test_name_snapshot_survives_rename_and_delete() {
        let db = sqlite_with_catalogue().await;
        let service = CheckoutService::new(db.ledger());

        let tx = service.checkout(&request(&[(3, 1)])).await.unwrap();

        sqlx::query("UPDATE products SET name = 'Kecap Manis' WHERE id = 3")
            .execute(db.pool())
            .await
            .unwrap();
        db.products().delete(3).await.unwrap();

        let window = cashier_core::ReportWindow::day_of(tx.created_at).unwrap();
        let listed = db.ledger().transactions_in_window(&window).await.unwrap();
        assert_eq!(listed[0].details[0].product_name, "Kecap");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_checkouts_never_oversell() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("cashier.db")).max_connections(8))
            .await
            .unwrap();
        sqlx::query("INSERT INTO products (id, name, price, stock) VALUES (1, 'Indomie Godog', 3500, 10)")
            .execute(db.pool())
            .await
            .unwrap();

        let service = Arc::new(CheckoutService::new(db.ledger()));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                service.checkout(&request(&[(1, 3)])).await
            }));
        }

        let mut committed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => committed += 1,
                Err(CheckoutError::InsufficientStock { .. }) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }

        // 10 units, 3 per checkout: exactly three can succeed.
        assert_eq!(committed, 3);
        assert_eq!(sqlite_stock(&db, 1).await, 1);
        assert_eq!(sqlite_transaction_count(&db).await, 3);
    }

    #[tokio::test]
    async fn test_sqlite_ledger_is_cloneable_service_state() {
        let db = sqlite_with_catalogue().await;
        let service: CheckoutService<SqliteLedger> = CheckoutService::new(db.ledger());
        let cloned = service.clone();
        cloned.checkout(&request(&[(2, 1)])).await.unwrap();
        assert_eq!(sqlite_stock(&db, 2).await, 39);
    }

    #[tokio::test]
    async fn test_abandoned_checkouts_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert_abandoned_checkouts_leave_ledger_usable(db).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_abandoned_checkouts_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("cashier.db")).max_connections(2))
            .await
            .unwrap();
        assert_abandoned_checkouts_leave_ledger_usable(db).await;
    }

    // -------------------------------------------------------------------------
    // Memory ledger
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_memory_single_item_checkout() {
        let ledger = memory_with_catalogue().await;
        let service = CheckoutService::new(ledger.clone());

        let tx = service.checkout(&request(&[(1, 3)])).await.unwrap();
        assert_eq!(tx.total_amount, 10500);
        assert_eq!(ledger.stock_of(1).await, Some(7));

        let err = service.checkout(&request(&[(1, 20)])).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock { available: 7, requested: 20, .. }
        ));
        assert_eq!(ledger.stock_of(1).await, Some(7));
        assert_eq!(ledger.transaction_count().await, 1);
    }

    #[tokio::test]
    async fn test_memory_partial_failure_is_atomic() {
        let ledger = memory_with_catalogue().await;
        let service = CheckoutService::new(ledger.clone());

        let err = service
            .checkout(&request(&[(2, 5), (3, 1), (404, 1)]))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::ProductNotFound { product_id: 404 }));

        assert_eq!(ledger.stock_of(2).await, Some(40));
        assert_eq!(ledger.stock_of(3).await, Some(20));
        assert_eq!(ledger.transaction_count().await, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_memory_concurrent_checkouts_never_oversell() {
        let ledger = memory_with_catalogue().await;
        let service = Arc::new(CheckoutService::new(ledger.clone()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.checkout(&request(&[(1, 3)])).await })
            })
            .collect();

        let mut committed = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                committed += 1;
            }
        }

        assert_eq!(committed, 3);
        assert_eq!(ledger.stock_of(1).await, Some(1));
    }

    #[tokio::test]
    async fn test_memory_abandoned_checkouts_discard_staged_writes() {
        let ledger = memory_with_catalogue().await;
        let service = CheckoutService::new(ledger.clone());

        let mut completed = 0;
        for turns in 0..8 {
            if checkout_abandoned_after(&service, &[(2, 1)], turns).await {
                completed += 1;
            }
            assert_eq!(ledger.stock_of(2).await, Some(40 - completed));
            assert_eq!(ledger.transaction_count().await as i64, completed);
        }

        service.checkout(&request(&[(2, 1)])).await.unwrap();
        assert_eq!(ledger.stock_of(2).await, Some(39 - completed));
    }
}

