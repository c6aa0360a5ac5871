//! Download quota errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Errors from the quota store.
#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    /// Redis is unreachable or the script failed.
    #[error("Download quota store unavailable")]
    RedisUnavailable,
}

impl IntoResponse for QuotaError {
    fn into_response(self) -> Response {
        match self {
            Self::RedisUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "error": "service_unavailable",
                    "message": self.to_string(),
                })),
            )
                .into_response(),
        }
    }
}
