use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use serde_json::{json, Value};

use recycle_stock::{ReportFilter, ReportParams};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/report?date=2024-03-01&categoryId=1&minPrice=10&limit=10&offset=0
///
/// One page of the net-stock report. `res_total` is the number of groups
/// across all pages.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ReportParams>,
) -> Result<Json<Value>, AppError> {
    let filter = ReportFilter::try_from(&params)?;
    let report = state.ledger.report(filter).await?;

    Ok(Json(json!({
        "res_code": 200,
        "res_message": "success",
        "res_total": report.total,
        "data": report.rows,
    })))
}
