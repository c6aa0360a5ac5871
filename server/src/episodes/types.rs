//! Episode access response types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use vs_common::QualityTier;

use crate::access::{ContentAge, DownloadTier};
use crate::quota::QuotaResult;

/// A streamable tier with its manifest.
#[derive(Debug, Clone, Serialize)]
pub struct StreamSource {
    pub tier: QualityTier,
    pub manifest: String,
}

/// Everything the player and the download list need for one episode.
#[derive(Debug, Clone, Serialize)]
pub struct AccessResponse {
    pub episode_id: Uuid,
    pub slug: String,
    pub title: String,
    /// Whole days since upload.
    pub content_age: ContentAge,
    /// Streamable tiers, lowest to highest.
    pub stream: Vec<StreamSource>,
    /// One entry per downloadable tier, lowest to highest.
    pub downloads: Vec<DownloadTier>,
}

/// Manifest for one permitted stream tier.
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackResponse {
    pub episode_id: Uuid,
    pub tier: QualityTier,
    pub manifest: String,
}

/// A granted download.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadResponse {
    pub episode_id: Uuid,
    pub tier: QualityTier,
    pub url: String,
    /// Present when the download used one of today's top-tier downloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaStatus>,
}

/// Today's top-tier download usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    pub used: u32,
    pub limit: u32,
    pub remaining: u32,
    pub resets_at: DateTime<Utc>,
}

impl QuotaStatus {
    #[must_use]
    pub const fn new(used: u32, limit: u32, resets_at: DateTime<Utc>) -> Self {
        Self {
            used,
            limit,
            remaining: limit.saturating_sub(used),
            resets_at,
        }
    }
}

/// The signed-in viewer's quota.
///
/// Premium and staff accounts report `unmetered: true` and no counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewerQuotaResponse {
    pub unmetered: bool,
    #[serde(flatten)]
    pub quota: Option<QuotaStatus>,
}

impl ViewerQuotaResponse {
    #[must_use]
    pub const fn unmetered() -> Self {
        Self {
            unmetered: true,
            quota: None,
        }
    }

    #[must_use]
    pub const fn metered(quota: QuotaStatus) -> Self {
        Self {
            unmetered: false,
            quota: Some(quota),
        }
    }
}

impl From<QuotaResult> for QuotaStatus {
    fn from(result: QuotaResult) -> Self {
        Self::new(result.used, result.limit, result.resets_at)
    }
}
