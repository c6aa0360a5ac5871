//! User-level feature flags.
//!
//! Stored in the `users.feature_flags` column. The premium bit lifts every
//! age and quota restriction on episode quality tiers.

use bitflags::bitflags;

bitflags! {
    /// User-level feature flags.
    ///
    /// Stored as BIGINT in PostgreSQL; only bits 0-62 are used so the sign
    /// bit never matters. Use `from_db` and `to_db` at the database boundary.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct UserFeatures: i64 {
        /// Active premium subscription.
        const PREMIUM = 1 << 0;
    }
}

impl UserFeatures {
    /// Create features from a database BIGINT value.
    ///
    /// Invalid bits are silently ignored to maintain forward compatibility.
    #[must_use]
    pub const fn from_db(value: i64) -> Self {
        Self::from_bits_truncate(value)
    }

    /// Convert features to a database BIGINT value.
    #[must_use]
    pub const fn to_db(self) -> i64 {
        self.bits()
    }

    /// Check if the account has an active premium subscription.
    #[must_use]
    pub const fn is_premium(&self) -> bool {
        self.contains(Self::PREMIUM)
    }
}
