//! Tier -> delivery locator maps.
//!
//! Episodes store one map for stream manifests and one for download files.
//! A tier is available only when its locator is non-blank; availability is
//! never configured per episode.

use std::collections::BTreeMap;

use tracing::debug;
use vs_common::QualityTier;

/// Delivery locators (manifest paths or file keys) keyed by tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierLocators(BTreeMap<QualityTier, String>);

impl TierLocators {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the locator for a tier. Blank locators are dropped.
    pub fn insert(&mut self, tier: QualityTier, locator: impl Into<String>) {
        let locator = locator.into();
        if locator.trim().is_empty() {
            self.0.remove(&tier);
        } else {
            self.0.insert(tier, locator);
        }
    }

    /// Builds a map from a JSON object keyed by resolution.
    ///
    /// Keys may be `"1080"` or `"1080p"`. Unknown resolutions, non-string
    /// values and blank locators are skipped. Anything other than an object
    /// yields an empty map.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut locators = Self::new();
        let Some(object) = value.as_object() else {
            return locators;
        };

        for (key, value) in object {
            let Ok(tier) = key.parse::<QualityTier>() else {
                debug!(key = %key, "Skipping locator for unknown quality tier");
                continue;
            };
            // A blank spelling of a tier must not erase another spelling's locator.
            if let Some(locator) = value.as_str().filter(|l| !l.trim().is_empty()) {
                locators.0.insert(tier, locator.to_string());
            }
        }

        locators
    }

    /// Tiers with a locator, lowest to highest.
    #[must_use]
    pub fn available_tiers(&self) -> Vec<QualityTier> {
        self.0.keys().copied().collect()
    }

    /// Returns the locator for a tier, if available.
    #[must_use]
    pub fn get(&self, tier: QualityTier) -> Option<&str> {
        self.0.get(&tier).map(String::as_str)
    }

    /// Returns true if no tier is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(QualityTier, S)> for TierLocators {
    fn from_iter<I: IntoIterator<Item = (QualityTier, S)>>(iter: I) -> Self {
        let mut locators = Self::new();
        for (tier, locator) in iter {
            locators.insert(tier, locator);
        }
        locators
    }
}
