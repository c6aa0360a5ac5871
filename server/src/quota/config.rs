//! Download quota configuration.

/// Configuration for the daily download counter.
#[derive(Debug, Clone)]
pub struct QuotaConfig {
    /// Whether downloads are counted at all
    pub enabled: bool,
    /// Prefix for Redis keys (e.g., "episodes:dlq")
    pub redis_key_prefix: String,
    /// Whether to allow top-tier downloads when Redis is unavailable
    pub fail_open: bool,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            redis_key_prefix: "episodes:dlq".to_string(),
            fail_open: false,
        }
    }
}

impl QuotaConfig {
    /// Creates configuration from environment variables.
    ///
    /// Environment variables:
    /// - `DOWNLOAD_QUOTA_ENABLED`: Enable/disable counting (default: true)
    /// - `DOWNLOAD_QUOTA_PREFIX`: Redis key prefix (default: "episodes:dlq")
    /// - `DOWNLOAD_QUOTA_FAIL_OPEN`: Allow downloads when Redis unavailable (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("DOWNLOAD_QUOTA_ENABLED") {
            config.enabled = val.parse().unwrap_or(true);
        }
        if let Ok(val) = std::env::var("DOWNLOAD_QUOTA_PREFIX") {
            config.redis_key_prefix = val;
        }
        if let Ok(val) = std::env::var("DOWNLOAD_QUOTA_FAIL_OPEN") {
            config.fail_open = val.parse().unwrap_or(false);
        }

        config
    }
}
