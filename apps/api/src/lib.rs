//! # cashier-api: REST Server for the Cashier Backend
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Request Path                                     │
//! │                                                                         │
//! │  HTTP ──► TraceLayer ──► routes::* ──► AppState ──► cashier-db         │
//! │                              │                                          │
//! │                              └── errors ──► ApiError {code, message}    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The binary in `main.rs` only loads config, opens the database and serves
//! [`router`]; tests drive the same router in-process.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub use crate::config::AppConfig;
pub use crate::error::{ApiError, AppResult, ErrorCode};
pub use crate::state::AppState;

/// Builds the application router with request tracing.
pub fn router(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Installs the global fmt subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
