use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Unified error type that renders as a `{"res_code": ..., "res_message": ...}`
/// response with a matching HTTP status code.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({
            "res_code": self.status.as_u16(),
            "res_message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<recycle_stock::StockError> for AppError {
    fn from(e: recycle_stock::StockError) -> Self {
        match &e {
            recycle_stock::StockError::InvalidArgument(msg) => AppError::bad_request(msg.clone()),
            _ => {
                tracing::error!("Request failed: {e}");
                AppError::internal(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recycle_stock::StockError;

    #[test]
    fn bad_filter_input_is_a_client_error() {
        let err = AppError::from(StockError::InvalidArgument("limit must be an integer".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn server_faults_are_internal_errors() {
        for e in [
            StockError::Internal("ledger lock poisoned".into()),
            StockError::MalformedPayload("order 1: bad date".into()),
        ] {
            assert_eq!(AppError::from(e).status, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
