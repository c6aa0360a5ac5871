//! Database Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use vs_common::{Viewer, ViewerRole};

use super::UserFeatures;
use crate::access::{ContentAge, TierLocators};

/// Viewer profile, mirrored from the auth provider.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub role: ProfileRole,
    pub feature_flags: i64,
    pub created_at: DateTime<Utc>,
}

/// Stored account role. Guests have no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "viewer_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProfileRole {
    User,
    Moderator,
    Admin,
}

impl From<ProfileRole> for ViewerRole {
    fn from(role: ProfileRole) -> Self {
        match role {
            ProfileRole::User => Self::User,
            ProfileRole::Moderator => Self::Moderator,
            ProfileRole::Admin => Self::Admin,
        }
    }
}

impl Profile {
    /// Feature flags decoded from the stored bitfield.
    #[must_use]
    pub const fn features(&self) -> UserFeatures {
        UserFeatures::from_db(self.feature_flags)
    }

    /// Access context for this account.
    #[must_use]
    pub fn viewer(&self) -> Viewer {
        Viewer::authenticated(self.id, self.role.into(), self.features().is_premium())
    }
}

/// Episode metadata.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Episode {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub stream_sources: serde_json::Value,
    pub download_sources: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Episode {
    /// HLS manifest paths by tier.
    #[must_use]
    pub fn stream_locators(&self) -> TierLocators {
        TierLocators::from_json(&self.stream_sources)
    }

    /// Download file keys by tier.
    #[must_use]
    pub fn download_locators(&self) -> TierLocators {
        TierLocators::from_json(&self.download_sources)
    }

    /// Whole days since upload as of `now`.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> ContentAge {
        ContentAge::since(self.uploaded_at, now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;
    use vs_common::QualityTier;

    use super::*;

    fn profile(role: ProfileRole, feature_flags: i64) -> Profile {
        Profile {
            id: Uuid::now_v7(),
            username: "viewer".into(),
            display_name: "Viewer".into(),
            role,
            feature_flags,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_viewer() {
        let regular = profile(ProfileRole::User, 0).viewer();
        assert_eq!(regular.role, ViewerRole::User);
        assert!(!regular.is_premium);
        assert!(regular.id.is_some());

        let premium = profile(ProfileRole::User, UserFeatures::PREMIUM.to_db()).viewer();
        assert!(premium.is_premium);

        let moderator = profile(ProfileRole::Moderator, 0).viewer();
        assert!(moderator.has_unrestricted_access());
    }

    #[test]
    fn test_episode_locators_and_age() {
        let now = Utc::now();
        let episode = Episode {
            id: Uuid::now_v7(),
            slug: "pilot".into(),
            title: "Pilot".into(),
            uploaded_at: Some(now - Duration::days(9)),
            stream_sources: json!({"480": "hls/pilot/480.m3u8", "2160": "hls/pilot/2160.m3u8"}),
            download_sources: json!({"1080": "dl/pilot-1080.mp4", "2160": ""}),
            created_at: now,
        };

        assert_eq!(
            episode.stream_locators().available_tiers(),
            vec![QualityTier::Sd480, QualityTier::Uhd2160]
        );
        assert_eq!(
            episode.download_locators().available_tiers(),
            vec![QualityTier::FullHd1080]
        );
        assert_eq!(episode.age(now).days(), 9);
    }
}
