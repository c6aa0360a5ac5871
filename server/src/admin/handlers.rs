//! Admin Handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::types::{AdminError, UserQuotaResponse};
use crate::api::AppState;
use crate::auth::CurrentViewer;
use crate::db::{self, Profile};
use crate::episodes::QuotaStatus;
use crate::quota::DownloadQuota;

async fn load_user(state: &AppState, user_id: Uuid) -> Result<Profile, AdminError> {
    db::find_profile_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AdminError::NotFound("User".to_string()))
}

fn quota(state: &AppState) -> Result<&DownloadQuota, AdminError> {
    state.quota.as_ref().ok_or(AdminError::QuotaDisabled)
}

/// Today's top-tier download usage for a user.
///
/// GET /api/admin/users/{user_id}/download-quota
#[tracing::instrument(skip(state))]
pub async fn get_user_download_quota(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserQuotaResponse>, AdminError> {
    let user = load_user(&state, user_id).await?;
    let used = quota(&state)?.used_today(user_id).await?;

    Ok(Json(UserQuotaResponse {
        user_id,
        username: user.username,
        quota: QuotaStatus::new(
            used,
            state.config.access.top_tier_daily_downloads,
            DownloadQuota::resets_at(Utc::now()),
        ),
    }))
}

/// Clear today's top-tier download count for a user.
///
/// DELETE /api/admin/users/{user_id}/download-quota
#[tracing::instrument(skip(state))]
pub async fn reset_user_download_quota(
    State(state): State<AppState>,
    CurrentViewer(admin): CurrentViewer,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, AdminError> {
    load_user(&state, user_id).await?;
    quota(&state)?.reset(user_id).await?;

    info!(
        admin_id = ?admin.id,
        user_id = %user_id,
        "Admin reset download quota"
    );

    Ok(StatusCode::NO_CONTENT)
}
