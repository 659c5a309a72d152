//! POST /api/checkout

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use cashier_core::{CheckoutRequest, Transaction};
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub message: String,
    pub data: Transaction,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/checkout", post(checkout))
}

/// Runs the whole cart as one atomic checkout.
///
/// Rejections (bad input, unknown product, short stock) are answered with
/// 400/404/409 and leave stock untouched.
pub async fn checkout(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<CheckoutResponse>)> {
    let transaction = state.checkout.checkout(&request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            success: true,
            message: "Transaction created successfully".to_string(),
            data: transaction,
        }),
    ))
}
