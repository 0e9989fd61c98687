use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use recycle_stock::queries::MasterDataQuery;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryParams {
    pub category_id: Option<String>,
}

/// GET /api/category
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let categories = state.ledger.read(|c| MasterDataQuery::new(c).categories()).await?;

    Ok(Json(json!({
        "res_code": 200,
        "res_message": "success",
        "res_result": categories,
    })))
}

/// GET /api/subcategory?categoryId=1
///
/// Sub-categories of one category. `categoryId` is required.
pub async fn list_sub_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubCategoryParams>,
) -> Result<Json<Value>, AppError> {
    let category_id = params
        .category_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("categoryId is required"))?;

    let sub_categories = state
        .ledger
        .read(move |c| MasterDataQuery::new(c).sub_categories(&category_id))
        .await?;

    Ok(Json(json!({
        "res_code": 200,
        "res_message": "success",
        "res_result": sub_categories,
    })))
}

/// POST /api/master/sync
///
/// Insert upstream categories and sub-categories that are not stored yet.
pub async fn sync_master_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let summary = state.ledger.sync_master_data().await?;

    Ok(Json(json!({
        "res_code": 200,
        "res_message": "success",
        "res_result": summary,
    })))
}
