//! Product CRUD.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use cashier_core::{Product, ProductDraft};

use super::MessageResponse;
use crate::error::AppResult;
use crate::extract::{ApiJson, IdPath};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

/// GET /api/products
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let products = state.db.products().list().await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<Product>> {
    let product = state.db.products().get(id).await?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let product = state.db.products().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(draft): ApiJson<ProductDraft>,
) -> AppResult<Json<Product>> {
    let product = state.db.products().update(id, &draft).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id}
///
/// Sold lines keep their name snapshot, so the ledger is unaffected.
pub async fn delete(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<MessageResponse>> {
    state.db.products().delete(id).await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
