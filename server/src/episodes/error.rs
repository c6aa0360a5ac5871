//! Episode Error Types

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::access::LockReason;
use crate::quota::QuotaError;
use crate::storage::S3Error;

#[derive(Debug, thiserror::Error)]
pub enum EpisodeError {
    #[error("Episode not found")]
    NotFound,

    #[error("Unknown quality tier: {0}")]
    InvalidTier(String),

    #[error("Quality not available for this episode")]
    TierUnavailable,

    #[error("Quality not available for your account")]
    StreamLocked,

    #[error("{0}")]
    DownloadLocked(LockReason),

    #[error(transparent)]
    Quota(#[from] QuotaError),

    #[error("Storage error: {0}")]
    Storage(#[from] S3Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for EpisodeError {
    fn into_response(self) -> axum::response::Response {
        let message = self.to_string();
        let (status, code) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "episode_not_found"),
            Self::InvalidTier(_) => (StatusCode::BAD_REQUEST, "invalid_tier"),
            Self::TierUnavailable => (StatusCode::NOT_FOUND, "tier_unavailable"),
            Self::StreamLocked => (StatusCode::FORBIDDEN, "stream_locked"),
            Self::DownloadLocked(reason) => (StatusCode::FORBIDDEN, reason.code()),
            Self::Quota(err) => return err.into_response(),
            Self::Storage(err) => {
                tracing::error!("Storage error in episodes: {}", err);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": "storage_error",
                        "message": "Failed to prepare download",
                    })),
                )
                    .into_response();
            }
            Self::Database(err) => {
                tracing::error!("Database error in episodes: {}", err);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": "database_error",
                        "message": "Database error",
                    })),
                )
                    .into_response();
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}
