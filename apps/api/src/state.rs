//! Shared handler state.

use cashier_db::{CheckoutService, Database, SalesReporter, SqliteLedger};

/// Cloned into every request; all members share one connection pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub checkout: CheckoutService<SqliteLedger>,
    pub reporter: SalesReporter<SqliteLedger>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let checkout = CheckoutService::new(db.ledger());
        let reporter = SalesReporter::new(db.ledger());
        Self {
            db,
            checkout,
            reporter,
        }
    }
}
