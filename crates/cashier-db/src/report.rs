//! # Sales Reporter
//!
//! Aggregated sales over a time window: the transactions themselves plus
//! count, revenue and best-selling product.
//!
//! ## Entry Points
//! ```text
//! GET /api/report/today                         → report_today()
//! GET /api/report?start_date=..&end_date=..     → report_by_dates(s, e)
//! (library callers with exact instants)         → report_by_window(s, e)
//!                     │
//!                     ▼
//!               ReportWindow [start, end)
//!                     │
//!                     ▼
//!          window_report (one read snapshot)
//!                     │
//!                     ▼
//!              AggregateReport
//! ```

use cashier_core::{AggregateReport, ReportWindow};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::ReportError;
use crate::store::LedgerStore;

/// Builds sales reports from a ledger store.
#[derive(Debug, Clone)]
pub struct SalesReporter<S> {
    store: S,
}

impl<S: LedgerStore> SalesReporter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Report for `[start, end)`. `end` must be after `start`.
    pub async fn report_by_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<AggregateReport, ReportError> {
        let window = ReportWindow::new(start, end)?;
        self.report(&window).await
    }

    /// Report for the current UTC calendar day.
    pub async fn report_today(&self) -> Result<AggregateReport, ReportError> {
        let window = ReportWindow::day_of(Utc::now())?;
        self.report(&window).await
    }

    /// Report for whole `YYYY-MM-DD` days, both ends inclusive.
    pub async fn report_by_dates(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<AggregateReport, ReportError> {
        let window = ReportWindow::parse(start_date, end_date)?;
        self.report(&window).await
    }

    /// Report for an already-built window.
    pub async fn report(&self, window: &ReportWindow) -> Result<AggregateReport, ReportError> {
        let report = self.store.window_report(window).await?;

        if report.total_transactions != report.transactions.len() as i64 {
            warn!(
                counted = report.total_transactions,
                listed = report.transactions.len(),
                "Report count and listing disagree"
            );
        }

        info!(
            start = %window.start(),
            end = %window.end(),
            total_transactions = report.total_transactions,
            total_revenue = report.total_revenue,
            "Report built"
        );

        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use cashier_core::{BestSellingProduct, CheckoutItem, CheckoutRequest, ValidationError};

    use super::*;
    use crate::checkout::CheckoutService;
    use crate::pool::{Database, DbConfig};
    use crate::store::MemoryLedger;

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
             (2, 'Vit 1000ml', 3000, 40)",
        )
        .execute(db.pool())
        .await
        .unwrap();
        db
    }

    fn assert_consistent(report: &AggregateReport) {
        assert_eq!(report.total_transactions, report.transactions.len() as i64);
        assert_eq!(
            report.total_revenue,
            report.transactions.iter().map(|t| t.total_amount).sum::<i64>()
        );
        for tx in &report.transactions {
            assert_eq!(tx.total_amount, tx.details.iter().map(|d| d.subtotal).sum::<i64>());
        }
    }

    #[tokio::test]
    async fn test_today_report_after_checkouts() {
        let db = sqlite_with_catalogue().await;
        let checkout = CheckoutService::new(db.ledger());
        let reporter = SalesReporter::new(db.ledger());

        let first = checkout.checkout(&request(&[(1, 3)])).await.unwrap();
        let second = checkout.checkout(&request(&[(2, 2), (1, 1)])).await.unwrap();

        let report = reporter.report_today().await.unwrap();
        assert_consistent(&report);

        assert_eq!(report.total_transactions, 2);
        assert_eq!(report.total_revenue, 10500 + 6000 + 3500);
        assert_eq!(report.transactions[0].id, second.id);
        assert_eq!(report.transactions[1].id, first.id);
        assert_eq!(report.transactions[0].details.len(), 2);
        assert_eq!(
            report.best_selling_product,
            Some(BestSellingProduct {
                id: 1,
                name: "Indomie Godog".to_string(),
                total_sold: 4,
            })
        );
    }

    #[tokio::test]
    async fn test_empty_window_is_not_an_error() {
        let db = sqlite_with_catalogue().await;
        let reporter = SalesReporter::new(db.ledger());

        let report = reporter
            .report_by_dates("2020-01-01", "2020-01-31")
            .await
            .unwrap();
        assert_eq!(report, AggregateReport::empty());
    }

    #[tokio::test]
    async fn test_report_by_window_rejects_inverted_range() {
        let reporter = SalesReporter::new(MemoryLedger::new());
        let now = Utc::now();

        let err = reporter.report_by_window(now, now).await.unwrap_err();
        assert!(matches!(
            err,
            ReportError::Validation(ValidationError::OutOfOrder { .. })
        ));
    }

    #[tokio::test]
    async fn test_report_by_dates_validates_format() {
        let reporter = SalesReporter::new(MemoryLedger::new());

        let err = reporter
            .report_by_dates("2026-2-1", "2026-02-03")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::Validation(ValidationError::InvalidFormat { .. })
        ));

        let err = reporter
            .report_by_dates("2026-02-03", "2026-02-01")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::Validation(ValidationError::OutOfOrder { .. })
        ));
    }

    #[tokio::test]
    async fn test_memory_ledger_report_matches_sqlite_semantics() {
        let ledger = MemoryLedger::new();
        ledger.put_product(1, "Indomie Godog", 3500, 10).await;
        ledger.put_product(2, "Vit 1000ml", 3000, 40).await;

        let checkout = CheckoutService::new(ledger.clone());
        checkout.checkout(&request(&[(2, 3)])).await.unwrap();
        checkout.checkout(&request(&[(1, 3)])).await.unwrap();
        let _ = checkout.checkout(&request(&[(1, 50)])).await.unwrap_err();

        let reporter = SalesReporter::new(ledger);
        let report = reporter.report_today().await.unwrap();
        assert_consistent(&report);

        assert_eq!(report.total_transactions, 2);
        assert_eq!(report.total_revenue, 9000 + 10500);
        // 3 units each: the lower id wins.
        assert_eq!(report.best_selling_product.map(|b| b.id), Some(1));
    }

    #[tokio::test]
    async fn test_window_excludes_other_days() {
        let db = sqlite_with_catalogue().await;
        let checkout = CheckoutService::new(db.ledger());
        let tx = checkout.checkout(&request(&[(1, 1)])).await.unwrap();

        let reporter = SalesReporter::new(db.ledger());
        let day_before = tx.created_at - chrono::Duration::days(1);
        let report = reporter
            .report_by_window(day_before - chrono::Duration::hours(1), day_before)
            .await
            .unwrap();
        assert_eq!(report.total_transactions, 0);
        assert!(report.best_selling_product.is_none());
    }

    #[tokio::test]
    async fn test_revenue_overflow_is_a_validation_error() {
        let ledger = MemoryLedger::new();
        ledger.put_product(1, "Emas Batangan", i64::MAX / 2 + 1, 2).await;

        let checkout = CheckoutService::new(ledger.clone());
        checkout.checkout(&request(&[(1, 1)])).await.unwrap();
        checkout.checkout(&request(&[(1, 1)])).await.unwrap();

        let err = SalesReporter::new(ledger).report_today().await.unwrap_err();
        assert!(matches!(
            err,
            ReportError::Validation(ValidationError::Overflow { .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reports_stay_consistent_while_checkouts_commit() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("cashier.db")).max_connections(4))
            .await
            .unwrap();
        sqlx::query("INSERT INTO products (id, name, price, stock) VALUES (1, 'Indomie Godog', 3500, 100)")
            .execute(db.pool())
            .await
            .unwrap();

        let checkout = CheckoutService::new(db.ledger());
        let writer = tokio::spawn(async move {
            for _ in 0..40 {
                checkout.checkout(&request(&[(1, 1)])).await.unwrap();
            }
        });

        let reporter = SalesReporter::new(db.ledger());
        while !writer.is_finished() {
            let report = reporter.report_today().await.unwrap();
            assert_consistent(&report);
            if let Some(best) = &report.best_selling_product {
                assert_eq!(best.total_sold, report.total_transactions);
            }
        }
        writer.await.unwrap();

        let report = reporter.report_today().await.unwrap();
        assert_consistent(&report);
        assert_eq!(report.total_transactions, 40);
    }
}
