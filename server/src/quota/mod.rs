//! Daily top-tier download quota.
//!
//! Redis-backed per-user counters, one per UTC day, consumed atomically
//! with a Lua script so concurrent downloads cannot overshoot the cap.

pub mod config;
pub mod counter;
pub mod error;

pub use config::QuotaConfig;
pub use counter::{DownloadQuota, QuotaResult};
pub use error::QuotaError;
