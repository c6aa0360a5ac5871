//! Content age in whole days since upload.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Whole days elapsed since an episode was uploaded. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ContentAge(u32);

impl ContentAge {
    /// Age of content uploaded today, or of unknown age.
    pub const ZERO: Self = Self(0);

    /// Computes the age of content uploaded at `uploaded_at`.
    ///
    /// A missing timestamp or one in the future yields zero days, the most
    /// restrictive age.
    #[must_use]
    pub fn since(uploaded_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        uploaded_at.map_or(Self::ZERO, |uploaded| {
            Self::from_days((now - uploaded).num_days())
        })
    }

    /// Creates an age from a day count, clamping negatives to zero.
    #[must_use]
    pub fn from_days(days: i64) -> Self {
        Self(u32::try_from(days.max(0)).unwrap_or(u32::MAX))
    }

    /// Number of whole days.
    #[must_use]
    pub const fn days(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn counts_whole_days() {
        let uploaded = now() - Duration::days(3) - Duration::hours(23);
        assert_eq!(ContentAge::since(Some(uploaded), now()).days(), 3);

        let uploaded = now() - Duration::days(10);
        assert_eq!(ContentAge::since(Some(uploaded), now()).days(), 10);
    }

    #[test]
    fn less_than_a_day_is_zero() {
        let uploaded = now() - Duration::hours(23);
        assert_eq!(ContentAge::since(Some(uploaded), now()), ContentAge::ZERO);
    }

    #[test]
    fn missing_timestamp_is_zero() {
        assert_eq!(ContentAge::since(None, now()), ContentAge::ZERO);
    }

    #[test]
    fn future_timestamp_is_zero() {
        let uploaded = now() + Duration::days(30);
        assert_eq!(ContentAge::since(Some(uploaded), now()), ContentAge::ZERO);
    }

    #[test]
    fn from_days_clamps() {
        assert_eq!(ContentAge::from_days(-5).days(), 0);
        assert_eq!(ContentAge::from_days(12).days(), 12);
        assert_eq!(ContentAge::from_days(i64::MAX).days(), u32::MAX);
    }
}
