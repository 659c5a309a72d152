//! Category CRUD.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use cashier_core::{Category, CategoryDraft};

use super::MessageResponse;
use crate::error::AppResult;
use crate::extract::{ApiJson, IdPath};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/categories", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_by_id).put(update).delete(delete))
}

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state.db.categories().list().await?;
    Ok(Json(categories))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<Category>> {
    let category = state.db.categories().get(id).await?;
    Ok(Json(category))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<CategoryDraft>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let category = state.db.categories().create(&draft).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ApiJson(draft): ApiJson<CategoryDraft>,
) -> AppResult<Json<Category>> {
    let category = state.db.categories().update(id, &draft).await?;
    Ok(Json(category))
}

/// Products in the category are kept with `category_id` cleared.
pub async fn delete(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<MessageResponse>> {
    state.db.categories().delete(id).await?;
    Ok(Json(MessageResponse::new("Category deleted successfully")))
}
