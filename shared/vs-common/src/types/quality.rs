//! Video quality tiers for episode playback and downloads.
//!
//! Provides a `QualityTier` enum over the fixed, ordered set of delivery
//! resolutions. The highest tier is subject to extra access gating.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Delivery resolution for an episode rendition.
///
/// Variants are declared lowest to highest, so the derived `Ord` follows
/// resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    /// 854x480, standard definition.
    #[serde(rename = "480p")]
    Sd480,
    /// 1280x720, high definition.
    #[serde(rename = "720p")]
    Hd720,
    /// 1920x1080, full high definition.
    #[serde(rename = "1080p")]
    FullHd1080,
    /// 3840x2160, ultra high definition. The gated top tier.
    #[serde(rename = "2160p")]
    Uhd2160,
}

/// Error returned when a string does not name a known tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quality tier: {0}")]
pub struct ParseTierError(pub String);

impl QualityTier {
    /// The highest tier in the enumeration.
    pub const TOP: Self = Self::Uhd2160;

    /// Vertical resolution in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        match self {
            Self::Sd480 => 480,
            Self::Hd720 => 720,
            Self::FullHd1080 => 1080,
            Self::Uhd2160 => 2160,
        }
    }

    /// Short label shown to viewers (e.g. "1080p").
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Sd480 => "480p",
            Self::Hd720 => "720p",
            Self::FullHd1080 => "1080p",
            Self::Uhd2160 => "2160p",
        }
    }

    /// Returns true for the top tier.
    #[must_use]
    pub const fn is_top(&self) -> bool {
        matches!(self, Self::Uhd2160)
    }

    /// Looks up a tier by vertical resolution.
    ///
    /// Returns `None` for resolutions outside the enumeration.
    #[must_use]
    pub const fn from_height(height: u32) -> Option<Self> {
        match height {
            480 => Some(Self::Sd480),
            720 => Some(Self::Hd720),
            1080 => Some(Self::FullHd1080),
            2160 => Some(Self::Uhd2160),
            _ => None,
        }
    }

    /// Returns all tiers in ascending order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Sd480, Self::Hd720, Self::FullHd1080, Self::Uhd2160]
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts `"1080"` and `"1080p"` (case-insensitive suffix).
impl FromStr for QualityTier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_suffix('p')
            .or_else(|| trimmed.strip_suffix('P'))
            .unwrap_or(trimmed);

        digits
            .parse::<u32>()
            .ok()
            .and_then(Self::from_height)
            .ok_or_else(|| ParseTierError(s.to_string()))
    }
}
