//! Admin Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::episodes::QuotaStatus;
use crate::quota::QuotaError;

/// Admin error types.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Caller is not an admin.
    #[error("Admin privileges required")]
    NotAdmin,

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// No quota store is configured.
    #[error("Download quota is disabled")]
    QuotaDisabled,

    /// Quota store error.
    #[error(transparent)]
    Quota(#[from] QuotaError),

    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotAdmin => (StatusCode::FORBIDDEN, serde_json::json!({"error": "not_admin", "message": "Admin privileges required"})),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, serde_json::json!({"error": "not_found", "message": format!("{what} not found")})),
            Self::QuotaDisabled => (StatusCode::NOT_FOUND, serde_json::json!({"error": "quota_disabled", "message": "Download quota is disabled"})),
            Self::Quota(e) => return e.into_response(),
            Self::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!({"error": "database", "message": "Database error"})),
        };
        (status, Json(body)).into_response()
    }
}

/// A user's download quota as seen by an admin.
#[derive(Debug, Serialize)]
pub struct UserQuotaResponse {
    pub user_id: Uuid,
    pub username: String,
    #[serde(flatten)]
    pub quota: QuotaStatus,
}
