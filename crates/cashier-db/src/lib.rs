//! # cashier-db: Database Layer for the Cashier Backend
//!
//! This crate provides database access and the two services that must run
//! against it: atomic checkout and sales reporting.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cashier Data Flow                                │
//! │                                                                         │
//! │  axum handler (POST /api/checkout)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cashier-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │  ┌───────────────┐   ┌────────────────┐   ┌─────────────────┐  │   │
//! │  │  │CheckoutService│   │ SalesReporter  │   │  Repositories   │  │   │
//! │  │  └───────┬───────┘   └───────┬────────┘   │ Product/Category│  │   │
//! │  │          │                   │            └────────┬────────┘  │   │
//! │  │          ▼                   ▼                     │           │   │
//! │  │  ┌─────────────────────────────────────┐           │           │   │
//! │  │  │ LedgerStore: SqliteLedger           │           │           │   │
//! │  │  │              MemoryLedger (tests)   │           │           │   │
//! │  │  └───────────────┬─────────────────────┘           │           │   │
//! │  │                  ▼                                 ▼           │   │
//! │  │  ┌─────────────────────────────────────────────────────────┐  │   │
//! │  │  │  Database (pool.rs) ── SqlitePool ── migrations         │  │   │
//! │  │  └─────────────────────────────────────────────────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and service error types
//! - [`repository`] - Generic CRUD for products and categories
//! - [`store`] - Ledger store traits and implementations
//! - [`checkout`] - Atomic checkout orchestration
//! - [`report`] - Date-window sales aggregation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cashier_db::{CheckoutService, Database, DbConfig, SalesReporter};
//!
//! let db = Database::new(DbConfig::new("cashier.db")).await?;
//!
//! let checkout = CheckoutService::new(db.ledger());
//! let transaction = checkout.checkout(&request).await?;
//!
//! let reporter = SalesReporter::new(db.ledger());
//! let today = reporter.report_today().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod report;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::CheckoutService;
pub use error::{CheckoutError, DbError, DbResult, ReportError};
pub use pool::{Database, DbConfig};
pub use report::SalesReporter;
pub use repository::{CategoryRepository, ProductRepository};
pub use store::{CheckoutScope, LedgerStore, MemoryLedger, SqliteLedger};
