//! Sales report endpoints.
//!
//! ```text
//! GET /api/report/today
//! GET /api/report                                   → today
//! GET /api/report?start_date=2026-02-01&end_date=2026-02-07
//! GET /api/report?start_date=2026-02-01             → 400
//! ```

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use cashier_core::{AggregateReport, BestSellingProduct, Transaction};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, AppResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl ReportQuery {
    /// Empty parameters count as absent.
    fn dates(&self) -> (Option<&str>, Option<&str>) {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.is_empty())
        }
        (present(&self.start_date), present(&self.end_date))
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub message: String,
    pub data: Vec<Transaction>,
    pub total_transactions: i64,
    pub total_revenue: i64,
    pub best_selling_product: Option<BestSellingProduct>,
}

impl From<AggregateReport> for ReportResponse {
    fn from(report: AggregateReport) -> Self {
        ReportResponse {
            success: true,
            message: "Transactions retrieved successfully".to_string(),
            data: report.transactions,
            total_transactions: report.total_transactions,
            total_revenue: report.total_revenue,
            best_selling_product: report.best_selling_product,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/report", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(by_dates))
        .route("/today", get(today))
}

/// GET /api/report/today
pub async fn today(State(state): State<AppState>) -> AppResult<Json<ReportResponse>> {
    let report = state.reporter.report_today().await?;
    Ok(Json(report.into()))
}

/// GET /api/report?start_date=YYYY-MM-DD&end_date=YYYY-MM-DD
pub async fn by_dates(
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> AppResult<Json<ReportResponse>> {
    let Query(query) = query?;
    let report = match query.dates() {
        (Some(start), Some(end)) => state.reporter.report_by_dates(start, end).await?,
        (None, None) => state.reporter.report_today().await?,
        _ => {
            return Err(ApiError::validation(
                "start_date and end_date must be provided together",
            ))
        }
    };
    Ok(Json(report.into()))
}
