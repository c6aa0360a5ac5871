//! Episode HTTP Handlers
//!
//! Every handler evaluates the access policy from the same inputs, so the
//! player, the download list and the download endpoint always agree.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use vs_common::{QualityTier, Viewer};

use crate::access::{AccessPolicy, AccessRequest, DownloadTier, LockReason};
use crate::api::AppState;
use crate::auth::CurrentViewer;
use crate::db::{self, Episode};
use crate::quota::{DownloadQuota, QuotaError};
use crate::storage::resolve_download_url;

use super::error::EpisodeError;
use super::types::{
    AccessResponse, DownloadResponse, PlaybackResponse, QuotaStatus, StreamSource,
    ViewerQuotaResponse,
};

// ============================================================================
// Helpers
// ============================================================================

async fn load_episode(state: &AppState, id_or_slug: &str) -> Result<Episode, EpisodeError> {
    db::find_episode(&state.db, id_or_slug)
        .await?
        .ok_or(EpisodeError::NotFound)
}

fn parse_tier(raw: &str) -> Result<QualityTier, EpisodeError> {
    raw.parse()
        .map_err(|_| EpisodeError::InvalidTier(raw.to_string()))
}

/// Top-tier downloads the viewer made today.
///
/// Guests, unrestricted viewers and deployments without a quota store
/// count as zero. With `fail_open`, an unreachable store also counts as zero.
async fn top_tier_downloads_used(
    quota: Option<&DownloadQuota>,
    viewer: &Viewer,
) -> Result<u32, QuotaError> {
    let (Some(user_id), Some(quota)) = (viewer.id, quota) else {
        return Ok(0);
    };
    if viewer.has_unrestricted_access() {
        return Ok(0);
    }

    match quota.used_today(user_id).await {
        Err(QuotaError::RedisUnavailable) if quota.config().fail_open => {
            warn!(user_id = %user_id, "Redis unavailable, counting no downloads (fail_open=true)");
            Ok(0)
        }
        other => other,
    }
}

/// Usage for the download listing; `None` when a fail-closed store is unreachable.
async fn listing_usage(quota: Option<&DownloadQuota>, viewer: &Viewer) -> Option<u32> {
    match top_tier_downloads_used(quota, viewer).await {
        Ok(used) => Some(used),
        Err(e) => {
            warn!(error = %e, "Download quota unavailable, locking top-tier downloads");
            None
        }
    }
}

/// Usage that decides a single download. Only metered tiers read the store.
async fn download_usage(
    quota: Option<&DownloadQuota>,
    viewer: &Viewer,
    tier: QualityTier,
) -> Result<u32, QuotaError> {
    if AccessPolicy::download_counts_toward_quota(tier, viewer) {
        top_tier_downloads_used(quota, viewer).await
    } else {
        Ok(0)
    }
}

/// Locks every offered download that would be metered.
fn lock_metered_downloads(downloads: Vec<DownloadTier>, viewer: &Viewer) -> Vec<DownloadTier> {
    downloads
        .into_iter()
        .map(|entry| {
            if !entry.is_locked() && AccessPolicy::download_counts_toward_quota(entry.tier(), viewer)
            {
                DownloadTier::locked(entry.tier(), LockReason::QuotaUnavailable)
            } else {
                entry
            }
        })
        .collect()
}

/// Counts one top-tier download; `None` when no quota store is configured.
async fn consume_top_tier_download(
    quota: Option<&DownloadQuota>,
    user_id: Uuid,
    limit: u32,
) -> Result<Option<QuotaStatus>, EpisodeError> {
    let Some(quota) = quota else {
        return Ok(None);
    };

    match quota.try_consume(user_id, limit).await {
        Ok(result) if result.allowed => Ok(Some(result.into())),
        // Another request took the last download between evaluation and now.
        Ok(_) => Err(EpisodeError::DownloadLocked(LockReason::DailyLimitReached {
            limit,
        })),
        Err(QuotaError::RedisUnavailable) if quota.config().fail_open => {
            warn!(user_id = %user_id, "Redis unavailable, allowing download (fail_open=true)");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Quota view for one viewer. Premium and staff accounts are never counted.
async fn viewer_quota(
    quota: Option<&DownloadQuota>,
    viewer: &Viewer,
    limit: u32,
) -> Result<ViewerQuotaResponse, QuotaError> {
    if viewer.has_unrestricted_access() {
        return Ok(ViewerQuotaResponse::unmetered());
    }

    let used = top_tier_downloads_used(quota, viewer).await?;
    Ok(ViewerQuotaResponse::metered(QuotaStatus::new(
        used,
        limit,
        DownloadQuota::resets_at(Utc::now()),
    )))
}

// ============================================================================
// Episode access
// ============================================================================

/// Stream and download options for an episode.
///
/// GET /api/episodes/{id_or_slug}/access
#[tracing::instrument(skip(state))]
pub async fn get_access(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Path(id_or_slug): Path<String>,
) -> Result<Json<AccessResponse>, EpisodeError> {
    let episode = load_episode(&state, &id_or_slug).await?;
    let policy = state.config.access;

    // An unreachable store locks the top tier rather than failing the page.
    let usage = listing_usage(state.quota.as_ref(), &viewer).await;

    let streams = episode.stream_locators();
    let downloads = episode.download_locators();
    let content_age = episode.age(Utc::now());

    let decision = policy.evaluate(&AccessRequest {
        stream_tiers: &streams.available_tiers(),
        download_tiers: &downloads.available_tiers(),
        viewer: &viewer,
        age: content_age,
        top_tier_downloads_used: usage.unwrap_or(0),
    });
    let downloads_listed = match usage {
        Some(_) => decision.downloads,
        None => lock_metered_downloads(decision.downloads, &viewer),
    };

    let stream = decision
        .stream
        .into_iter()
        .filter_map(|tier| {
            streams.get(tier).map(|manifest| StreamSource {
                tier,
                manifest: manifest.to_string(),
            })
        })
        .collect();

    Ok(Json(AccessResponse {
        episode_id: episode.id,
        slug: episode.slug,
        title: episode.title,
        content_age,
        stream,
        downloads: downloads_listed,
    }))
}

/// Manifest for one stream tier.
///
/// GET /api/episodes/{id_or_slug}/playback/{tier}
#[tracing::instrument(skip(state))]
pub async fn get_playback(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Path((id_or_slug, raw_tier)): Path<(String, String)>,
) -> Result<Json<PlaybackResponse>, EpisodeError> {
    let tier = parse_tier(&raw_tier)?;
    let episode = load_episode(&state, &id_or_slug).await?;

    let streams = episode.stream_locators();
    let manifest = streams.get(tier).ok_or(EpisodeError::TierUnavailable)?;

    let permitted = state.config.access.permitted_stream_tiers(
        &streams.available_tiers(),
        &viewer,
        episode.age(Utc::now()),
    );
    if !permitted.contains(&tier) {
        return Err(EpisodeError::StreamLocked);
    }

    Ok(Json(PlaybackResponse {
        episode_id: episode.id,
        tier,
        manifest: manifest.to_string(),
    }))
}

// ============================================================================
// Downloads
// ============================================================================

/// Grant a download.
///
/// POST /api/episodes/{id_or_slug}/downloads/{tier}
///
/// Top-tier downloads by regular accounts use one of the day's downloads;
/// the count is taken atomically after the URL is prepared.
#[tracing::instrument(skip(state))]
pub async fn create_download(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
    Path((id_or_slug, raw_tier)): Path<(String, String)>,
) -> Result<Json<DownloadResponse>, EpisodeError> {
    let tier = parse_tier(&raw_tier)?;
    let episode = load_episode(&state, &id_or_slug).await?;

    let downloads = episode.download_locators();
    let locator = downloads.get(tier).ok_or(EpisodeError::TierUnavailable)?;

    let policy = state.config.access;
    let used = download_usage(state.quota.as_ref(), &viewer, tier).await?;
    let entry = policy
        .permitted_download_tiers(
            &downloads.available_tiers(),
            &viewer,
            episode.age(Utc::now()),
            used,
        )
        .into_iter()
        .find(|entry| entry.tier() == tier)
        .ok_or(EpisodeError::TierUnavailable)?;

    if let Some(reason) = entry.reason() {
        return Err(EpisodeError::DownloadLocked(reason));
    }

    let url = resolve_download_url(state.s3.as_ref(), locator).await?;

    let quota = match viewer.id {
        Some(user_id) if AccessPolicy::download_counts_toward_quota(tier, &viewer) => {
            consume_top_tier_download(state.quota.as_ref(), user_id, policy.top_tier_daily_downloads)
                .await?
        }
        _ => None,
    };

    info!(
        episode_id = %episode.id,
        tier = %tier,
        user_id = ?viewer.id,
        "Download granted"
    );

    Ok(Json(DownloadResponse {
        episode_id: episode.id,
        tier,
        url,
        quota,
    }))
}

/// Today's top-tier download usage for the caller.
///
/// GET /api/me/download-quota
#[tracing::instrument(skip(state))]
pub async fn get_download_quota(
    State(state): State<AppState>,
    CurrentViewer(viewer): CurrentViewer,
) -> Result<Json<ViewerQuotaResponse>, EpisodeError> {
    let limit = state.config.access.top_tier_daily_downloads;
    Ok(Json(viewer_quota(state.quota.as_ref(), &viewer, limit).await?))
}
