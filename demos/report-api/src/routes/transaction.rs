use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/transaction
///
/// Pull the upstream transaction feed and import it as one unit of work.
pub async fn sync_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let summary = state.ledger.sync_transactions().await?;
    tracing::info!("Imported {} transactions", summary.transactions);

    Ok(Json(json!({
        "res_code": 200,
        "res_message": "success",
        "res_result": summary,
    })))
}
