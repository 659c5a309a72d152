//! # SQLite Ledger
//!
//! [`LedgerStore`] over the pooled SQLite database.
//!
//! ## Locking
//! ```text
//! checkout A                         checkout B
//! ──────────                         ──────────
//! BEGIN IMMEDIATE  (write lock) ✓
//!                                    BEGIN IMMEDIATE  ... busy, waiting
//! SELECT stock FROM products  = 7
//! UPDATE products SET stock = 4
//! INSERT transactions / details
//! COMMIT           (lock released)
//!                                    BEGIN IMMEDIATE  ✓
//!                                    SELECT stock      = 4  (sees A)
//! ```
//!
//! Waiting is bounded by the connection busy timeout; past it the scope
//! fails with a persistence error and nothing was written.

use std::collections::HashMap;

use async_trait::async_trait;
use cashier_core::{
    AggregateReport, BestSellingProduct, Money, PendingLine, ReportWindow, StockSnapshot,
    Transaction, TransactionDetail, WindowSummary,
};
use chrono::{DateTime, SubsecRound, Utc};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use super::{CheckoutScope, LedgerStore, TransactionHeader};
use crate::error::{DbError, DbResult};

const SELECT_WINDOW_TRANSACTIONS: &str = "SELECT id, total_amount, created_at \
     FROM transactions \
     WHERE created_at >= ? AND created_at < ? \
     ORDER BY created_at DESC, id DESC";

const SELECT_WINDOW_DETAILS: &str =
    "SELECT d.id, d.transaction_id, d.product_id, d.product_name, d.quantity, d.subtotal \
     FROM transaction_details d \
     JOIN transactions t ON t.id = d.transaction_id \
     WHERE t.created_at >= ? AND t.created_at < ? \
     ORDER BY d.transaction_id, d.id";

const SELECT_WINDOW_TOTALS: &str = "SELECT COUNT(*), COALESCE(SUM(total_amount), 0) \
     FROM transactions \
     WHERE created_at >= ? AND created_at < ?";

// Name comes from the latest detail row of the winning product in the window.
const SELECT_WINDOW_BEST_SELLER: &str = "SELECT d.product_id AS id, \
       (SELECT d2.product_name \
          FROM transaction_details d2 \
          JOIN transactions t2 ON t2.id = d2.transaction_id \
         WHERE d2.product_id = d.product_id \
           AND t2.created_at >= ?1 AND t2.created_at < ?2 \
         ORDER BY t2.created_at DESC, t2.id DESC, d2.id DESC \
         LIMIT 1) AS name, \
       SUM(d.quantity) AS total_sold \
     FROM transaction_details d \
     JOIN transactions t ON t.id = d.transaction_id \
     WHERE t.created_at >= ?1 AND t.created_at < ?2 \
     GROUP BY d.product_id \
     ORDER BY total_sold DESC, d.product_id ASC \
     LIMIT 1";

/// Formats a timestamp the way the ledger stores it: fixed-width UTC text,
/// so SQL string comparison matches chronological order.
pub(crate) fn sql_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

fn window_bounds(window: &ReportWindow) -> (String, String) {
    (sql_timestamp(window.start()), sql_timestamp(window.end()))
}

// =============================================================================
// Ledger
// =============================================================================

/// Ledger store backed by SQLite.
#[derive(Debug, Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for SqliteLedger {
    type Scope = SqliteScope;

    async fn begin(&self) -> DbResult<SqliteScope> {
        // IMMEDIATE takes the write lock now, before the first stock read.
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        debug!("Checkout scope opened");
        Ok(SqliteScope { tx })
    }

    async fn transactions_in_window(&self, window: &ReportWindow) -> DbResult<Vec<Transaction>> {
        // One read transaction so headers and details come from the same snapshot.
        let mut tx = self.pool.begin().await?;
        let transactions = fetch_transactions(&mut tx, window).await?;
        tx.commit().await?;
        Ok(transactions)
    }

    async fn summarize_window(&self, window: &ReportWindow) -> DbResult<WindowSummary> {
        let mut tx = self.pool.begin().await?;
        let summary = fetch_summary(&mut tx, window).await?;
        tx.commit().await?;
        Ok(summary)
    }

    async fn window_report(&self, window: &ReportWindow) -> DbResult<AggregateReport> {
        // Listing and figures share one snapshot, so a checkout committing
        // mid-report shows up in both or in neither.
        let mut tx = self.pool.begin().await?;
        let transactions = fetch_transactions(&mut tx, window).await?;
        let summary = fetch_summary(&mut tx, window).await?;
        tx.commit().await?;
        Ok(summary.into_report(transactions))
    }
}

async fn fetch_transactions(
    conn: &mut SqliteConnection,
    window: &ReportWindow,
) -> DbResult<Vec<Transaction>> {
    let (start, end) = window_bounds(window);

    let mut transactions = sqlx::query_as::<_, Transaction>(SELECT_WINDOW_TRANSACTIONS)
        .bind(start.as_str())
        .bind(end.as_str())
        .fetch_all(&mut *conn)
        .await?;

    let details = sqlx::query_as::<_, TransactionDetail>(SELECT_WINDOW_DETAILS)
        .bind(start.as_str())
        .bind(end.as_str())
        .fetch_all(&mut *conn)
        .await?;

    let mut by_transaction: HashMap<i64, Vec<TransactionDetail>> = HashMap::new();
    for detail in details {
        by_transaction
            .entry(detail.transaction_id)
            .or_default()
            .push(detail);
    }
    for transaction in &mut transactions {
        transaction.details = by_transaction.remove(&transaction.id).unwrap_or_default();
    }

    debug!(
        start = %start,
        end = %end,
        count = transactions.len(),
        "Fetched window transactions"
    );
    Ok(transactions)
}

async fn fetch_summary(conn: &mut SqliteConnection, window: &ReportWindow) -> DbResult<WindowSummary> {
    let (start, end) = window_bounds(window);

    let (total_transactions, total_revenue): (i64, i64) = sqlx::query_as(SELECT_WINDOW_TOTALS)
        .bind(start.as_str())
        .bind(end.as_str())
        .fetch_one(&mut *conn)
        .await?;

    let best_selling_product = sqlx::query_as::<_, BestSellingProduct>(SELECT_WINDOW_BEST_SELLER)
        .bind(start.as_str())
        .bind(end.as_str())
        .fetch_optional(&mut *conn)
        .await?;

    debug!(
        start = %start,
        end = %end,
        total_transactions,
        total_revenue,
        "Summarized window"
    );

    Ok(WindowSummary {
        total_transactions,
        total_revenue,
        best_selling_product,
    })
}

// =============================================================================
// Scope
// =============================================================================

#[derive(sqlx::FromRow)]
struct StockRow {
    id: i64,
    name: String,
    price: i64,
    stock: i64,
}

/// A checkout scope: an open `BEGIN IMMEDIATE` transaction.
///
/// Dropping it without [`CheckoutScope::commit`] rolls back.
pub struct SqliteScope {
    tx: sqlx::Transaction<'static, Sqlite>,
}

#[async_trait]
impl CheckoutScope for SqliteScope {
    async fn lock_product(&mut self, product_id: i64) -> DbResult<Option<StockSnapshot>> {
        let row = sqlx::query_as::<_, StockRow>(
            "SELECT id, name, price, stock FROM products WHERE id = ?",
        )
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        debug!(product_id, found = row.is_some(), "Locked product");

        Ok(row.map(|r| StockSnapshot {
            id: r.id,
            name: r.name,
            price: Money::from_minor(r.price),
            stock: r.stock,
        }))
    }

    async fn decrement_stock(&mut self, product_id: i64, quantity: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products \
             SET stock = stock - ?1, updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
             WHERE id = ?2 AND stock >= ?1",
        )
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() != 1 {
            return Err(DbError::TransactionFailed(format!(
                "stock of product {product_id} changed inside checkout scope"
            )));
        }

        debug!(product_id, quantity, "Decremented stock");
        Ok(())
    }

    async fn insert_transaction(&mut self, total: Money) -> DbResult<TransactionHeader> {
        // Stored at microsecond precision; truncate so the returned value
        // equals what a later read decodes.
        let created_at = Utc::now().trunc_subsecs(6);

        let result = sqlx::query("INSERT INTO transactions (total_amount, created_at) VALUES (?, ?)")
            .bind(total.minor())
            .bind(sql_timestamp(created_at))
            .execute(&mut *self.tx)
            .await?;

        let id = result.last_insert_rowid();
        debug!(transaction_id = id, total = %total, "Inserted transaction header");

        Ok(TransactionHeader { id, created_at })
    }

    async fn insert_detail(
        &mut self,
        transaction_id: i64,
        line: &PendingLine,
    ) -> DbResult<TransactionDetail> {
        let result = sqlx::query(
            "INSERT INTO transaction_details \
             (transaction_id, product_id, product_name, quantity, subtotal) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(transaction_id)
        .bind(line.product_id)
        .bind(line.product_name.as_str())
        .bind(line.quantity)
        .bind(line.subtotal.minor())
        .execute(&mut *self.tx)
        .await?;

        Ok(TransactionDetail {
            id: result.last_insert_rowid(),
            transaction_id,
            product_id: line.product_id,
            product_name: line.product_name.clone(),
            quantity: line.quantity,
            subtotal: line.subtotal.minor(),
        })
    }

    async fn commit(self) -> DbResult<()> {
        self.tx.commit().await?;
        debug!("Checkout scope committed");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
