//! Stream and download decision table.
//!
//! Rules, applied per available tier:
//! - Staff (moderator, admin) and premium viewers get every tier.
//! - Tiers below the top tier are open to everyone.
//! - The top tier is never offered to guests. Signed-in viewers may stream
//!   it once the episode is `top_tier_unlock_days` old, and may download it
//!   while they are under `top_tier_daily_downloads` for the day.
//!
//! Evaluation is pure: no I/O, no clock reads, no shared state. Callers
//! supply the content age and today's download count.

use std::fmt;

use serde::{Serialize, Serializer};
use tracing::warn;
use vs_common::{QualityTier, Viewer};

use super::ContentAge;

/// Days after upload before signed-in, non-premium viewers get the top tier.
pub const DEFAULT_TOP_TIER_UNLOCK_DAYS: u32 = 7;

/// Top-tier downloads per day for signed-in, non-premium viewers.
pub const DEFAULT_TOP_TIER_DAILY_DOWNLOADS: u32 = 3;

/// Process-wide access thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    /// Top-tier unlock window in days.
    pub top_tier_unlock_days: u32,
    /// Top-tier daily download cap.
    pub top_tier_daily_downloads: u32,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            top_tier_unlock_days: DEFAULT_TOP_TIER_UNLOCK_DAYS,
            top_tier_daily_downloads: DEFAULT_TOP_TIER_DAILY_DOWNLOADS,
        }
    }
}

/// Why a download is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    /// Guests cannot download the top tier.
    LoginRequired,
    /// The episode is still inside the unlock window.
    TooRecent {
        /// Whole days until the tier unlocks.
        days_remaining: u32,
    },
    /// The viewer used up today's top-tier downloads.
    DailyLimitReached {
        /// Configured daily cap.
        limit: u32,
    },
    /// Today's usage could not be read, so the top tier stays locked.
    QuotaUnavailable,
}

impl LockReason {
    /// Machine-readable reason code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::LoginRequired => "login_required",
            Self::TooRecent { .. } => "too_recent",
            Self::DailyLimitReached { .. } => "daily_limit_reached",
            Self::QuotaUnavailable => "quota_unavailable",
        }
    }
}

impl fmt::Display for LockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LoginRequired => f.write_str("Log in to download this quality"),
            Self::TooRecent { days_remaining: 1 } => f.write_str("Available in 1 more day"),
            Self::TooRecent { days_remaining } => {
                write!(f, "Available in {days_remaining} more days")
            }
            Self::DailyLimitReached { limit } => {
                write!(f, "Daily limit reached ({limit} per day)")
            }
            Self::QuotaUnavailable => {
                f.write_str("Downloads of this quality are temporarily unavailable")
            }
        }
    }
}

/// Serialized as the user-facing sentence.
impl Serialize for LockReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Download availability of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DownloadTier {
    tier: QualityTier,
    locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<LockReason>,
}

impl DownloadTier {
    /// An unlocked entry.
    #[must_use]
    pub const fn unlocked(tier: QualityTier) -> Self {
        Self {
            tier,
            locked: false,
            reason: None,
        }
    }

    /// A locked entry with its reason.
    #[must_use]
    pub const fn locked(tier: QualityTier, reason: LockReason) -> Self {
        Self {
            tier,
            locked: true,
            reason: Some(reason),
        }
    }

    /// The tier this entry describes.
    #[must_use]
    pub const fn tier(&self) -> QualityTier {
        self.tier
    }

    /// Whether the tier is locked.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock reason; `None` when unlocked.
    #[must_use]
    pub const fn reason(&self) -> Option<LockReason> {
        self.reason
    }
}

/// Inputs for one evaluation, gathered by the caller.
#[derive(Debug, Clone, Copy)]
pub struct AccessRequest<'a> {
    /// Tiers with a stream manifest, lowest to highest.
    pub stream_tiers: &'a [QualityTier],
    /// Tiers with a download file, lowest to highest.
    pub download_tiers: &'a [QualityTier],
    /// Who is asking.
    pub viewer: &'a Viewer,
    /// Content age.
    pub age: ContentAge,
    /// Top-tier downloads the viewer already made today.
    pub top_tier_downloads_used: u32,
}

/// Everything the player and the download list need for one episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    /// Streamable tiers, in input order.
    pub stream: Vec<QualityTier>,
    /// One entry per downloadable tier, in input order.
    pub downloads: Vec<DownloadTier>,
}

impl AccessPolicy {
    /// Loads thresholds from the environment.
    ///
    /// Environment variables:
    /// - `ACCESS_TOP_TIER_UNLOCK_DAYS`: unlock window in days (default: 7)
    /// - `ACCESS_TOP_TIER_DAILY_DOWNLOADS`: daily top-tier downloads (default: 3)
    pub fn from_env() -> Self {
        let mut policy = Self::default();

        if let Ok(val) = std::env::var("ACCESS_TOP_TIER_UNLOCK_DAYS") {
            match val.trim().parse() {
                Ok(days) => policy.top_tier_unlock_days = days,
                Err(_) => warn!(value = %val, "Invalid ACCESS_TOP_TIER_UNLOCK_DAYS, using default"),
            }
        }
        if let Ok(val) = std::env::var("ACCESS_TOP_TIER_DAILY_DOWNLOADS") {
            match val.trim().parse() {
                Ok(limit) => policy.top_tier_daily_downloads = limit,
                Err(_) => {
                    warn!(value = %val, "Invalid ACCESS_TOP_TIER_DAILY_DOWNLOADS, using default");
                }
            }
        }

        policy
    }

    /// Tiers the viewer may stream, in input order.
    #[must_use]
    pub fn permitted_stream_tiers(
        &self,
        available: &[QualityTier],
        viewer: &Viewer,
        age: ContentAge,
    ) -> Vec<QualityTier> {
        distinct(available)
            .filter(|tier| self.can_stream(*tier, viewer, age))
            .collect()
    }

    /// Download entries for every available tier, in input order.
    #[must_use]
    pub fn permitted_download_tiers(
        &self,
        available: &[QualityTier],
        viewer: &Viewer,
        age: ContentAge,
        top_tier_downloads_used: u32,
    ) -> Vec<DownloadTier> {
        distinct(available)
            .map(
                |tier| match self.download_lock(tier, viewer, age, top_tier_downloads_used) {
                    Some(reason) => DownloadTier::locked(tier, reason),
                    None => DownloadTier::unlocked(tier),
                },
            )
            .collect()
    }

    /// Evaluates streams and downloads from a single set of inputs.
    #[must_use]
    pub fn evaluate(&self, request: &AccessRequest<'_>) -> AccessDecision {
        AccessDecision {
            stream: self.permitted_stream_tiers(request.stream_tiers, request.viewer, request.age),
            downloads: self.permitted_download_tiers(
                request.download_tiers,
                request.viewer,
                request.age,
                request.top_tier_downloads_used,
            ),
        }
    }

    /// Whether downloading `tier` uses one of the viewer's daily downloads.
    #[must_use]
    pub const fn download_counts_toward_quota(tier: QualityTier, viewer: &Viewer) -> bool {
        tier.is_top() && !viewer.has_unrestricted_access() && !viewer.is_guest()
    }

    const fn is_past_unlock(&self, age: ContentAge) -> bool {
        age.days() >= self.top_tier_unlock_days
    }

    const fn can_stream(&self, tier: QualityTier, viewer: &Viewer, age: ContentAge) -> bool {
        if viewer.has_unrestricted_access() || !tier.is_top() {
            return true;
        }
        !viewer.is_guest() && self.is_past_unlock(age)
    }

    const fn download_lock(
        &self,
        tier: QualityTier,
        viewer: &Viewer,
        age: ContentAge,
        used: u32,
    ) -> Option<LockReason> {
        if viewer.has_unrestricted_access() || !tier.is_top() {
            return None;
        }
        if viewer.is_guest() {
            return Some(LockReason::LoginRequired);
        }
        if !self.is_past_unlock(age) {
            return Some(LockReason::TooRecent {
                days_remaining: self.top_tier_unlock_days - age.days(),
            });
        }
        if used >= self.top_tier_daily_downloads {
            return Some(LockReason::DailyLimitReached {
                limit: self.top_tier_daily_downloads,
            });
        }
        None
    }
}

/// Yields each tier once, keeping the first occurrence.
fn distinct(tiers: &[QualityTier]) -> impl Iterator<Item = QualityTier> + '_ {
    tiers
        .iter()
        .enumerate()
        .filter(|(i, tier)| !tiers[..*i].contains(tier))
        .map(|(_, tier)| *tier)
}
