//! Tiered quality access.
//!
//! Decides which quality tiers a viewer may stream and download for an
//! episode, based on role, premium status and how long ago it was uploaded.
//!
//! - `locators`: tier -> delivery locator maps and tier availability
//! - `age`: whole-day content age
//! - `policy`: the stream/download decision table

pub mod age;
pub mod locators;
pub mod policy;

pub use age::ContentAge;
pub use locators::TierLocators;
pub use policy::{
    AccessDecision, AccessPolicy, AccessRequest, DownloadTier, LockReason,
    DEFAULT_TOP_TIER_DAILY_DOWNLOADS, DEFAULT_TOP_TIER_UNLOCK_DAYS,
};
