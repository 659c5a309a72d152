//! HTTP routes, one module per resource.
//!
//! | Module       | Paths                                   |
//! |--------------|-----------------------------------------|
//! | `health`     | `/health`                               |
//! | `products`   | `/api/products`, `/api/products/{id}`   |
//! | `categories` | `/api/categories`, `/api/categories/{id}` |
//! | `checkout`   | `/api/checkout`                         |
//! | `report`     | `/api/report`, `/api/report/today`      |

pub mod categories;
pub mod checkout;
pub mod health;
pub mod products;
pub mod report;

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

/// All routes, without middleware or state.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(checkout::router())
        .merge(report::router())
}

/// Body returned by successful deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
