//! Redis-backed daily download counter.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use fred::prelude::*;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::quota::{QuotaConfig, QuotaError};

/// Embedded Lua script for atomic check-and-increment.
const CONSUME_SCRIPT: &str = include_str!("consume_download.lua");

/// Counters outlive their day by this much so late requests still see them.
const EXPIRY_SLACK_SECS: i64 = 3600;

/// Lua script return code for a counted download.
const SCRIPT_ALLOWED: i64 = 1;

/// Outcome of a consume attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaResult {
    /// Whether the download was counted
    pub allowed: bool,
    /// Downloads used today, including this one if allowed
    pub used: u32,
    /// Daily cap
    pub limit: u32,
    /// When today's counter resets
    pub resets_at: DateTime<Utc>,
}

/// Per-user daily top-tier download counter.
#[derive(Clone)]
pub struct DownloadQuota {
    redis: Client,
    config: Arc<QuotaConfig>,
    script_sha: Arc<RwLock<String>>,
}

impl DownloadQuota {
    /// Creates a new counter.
    ///
    /// Call `init()` after creation to load the Lua script into Redis.
    pub fn new(redis: Client, config: QuotaConfig) -> Self {
        Self {
            redis,
            config: Arc::new(config),
            script_sha: Arc::new(RwLock::new(String::new())),
        }
    }

    /// Loads the Lua script into Redis.
    pub async fn init(&mut self) -> Result<(), Error> {
        self.load_script().await
    }

    async fn load_script(&self) -> Result<(), Error> {
        let sha: String = self.redis.script_load(CONSUME_SCRIPT).await?;
        info!(sha = %sha, "Download quota script loaded into Redis");
        *self.script_sha.write().await = sha;
        Ok(())
    }

    fn is_noscript_error(error: &Error) -> bool {
        error.to_string().contains("NOSCRIPT")
    }

    /// Returns the configuration for this counter.
    pub fn config(&self) -> &QuotaConfig {
        &self.config
    }

    /// Top-tier downloads the user made today.
    #[tracing::instrument(skip(self))]
    pub async fn used_today(&self, user_id: Uuid) -> Result<u32, QuotaError> {
        if !self.config.enabled {
            return Ok(0);
        }

        let key = self.build_key(user_id, Utc::now().date_naive());
        let count: Option<i64> = self.redis.get(&key).await.map_err(|e| {
            warn!(error = %e, "Failed to read download quota");
            QuotaError::RedisUnavailable
        })?;

        Ok(count.unwrap_or(0).clamp(0, i64::from(u32::MAX)) as u32)
    }

    /// Counts one download if the user is below `limit` today.
    ///
    /// The check and the increment happen in one script, so concurrent
    /// requests cannot push the count past `limit`.
    #[tracing::instrument(skip(self))]
    pub async fn try_consume(&self, user_id: Uuid, limit: u32) -> Result<QuotaResult, QuotaError> {
        let now = Utc::now();
        let resets_at = Self::resets_at(now);

        if !self.config.enabled {
            return Ok(QuotaResult {
                allowed: true,
                used: 0,
                limit,
                resets_at,
            });
        }

        let key = self.build_key(user_id, now.date_naive());
        let ttl = (resets_at - now).num_seconds() + EXPIRY_SLACK_SECS;
        let result = self.execute_consume_script(&key, limit, ttl).await?;

        let used = result.first().copied().unwrap_or(0).max(0) as u32;
        let allowed = result.get(1).copied() == Some(SCRIPT_ALLOWED);

        if allowed {
            debug!(user_id = %user_id, used, limit, "Top-tier download counted");
        } else {
            debug!(user_id = %user_id, used, limit, "Top-tier download quota exhausted");
        }

        Ok(QuotaResult {
            allowed,
            used,
            limit,
            resets_at,
        })
    }

    async fn execute_consume_script(
        &self,
        key: &str,
        limit: u32,
        ttl_secs: i64,
    ) -> Result<Vec<i64>, QuotaError> {
        let args = vec![limit.to_string(), ttl_secs.to_string()];
        let sha = self.script_sha.read().await.clone();

        let result: Result<Vec<i64>, _> = self.redis.evalsha(&sha, vec![key], args.clone()).await;

        match result {
            Ok(r) => Ok(r),
            Err(e) if Self::is_noscript_error(&e) => {
                warn!("NOSCRIPT error, reloading download quota script");
                self.load_script().await.map_err(|e| {
                    warn!(error = %e, "Failed to reload quota script");
                    QuotaError::RedisUnavailable
                })?;

                let new_sha = self.script_sha.read().await.clone();
                self.redis
                    .evalsha(&new_sha, vec![key], args)
                    .await
                    .map_err(|e| {
                        warn!(error = %e, "Quota script failed after reload");
                        QuotaError::RedisUnavailable
                    })
            }
            Err(e) => {
                warn!(error = %e, "Quota script failed");
                Err(QuotaError::RedisUnavailable)
            }
        }
    }

    /// Clears today's counter for a user.
    #[tracing::instrument(skip(self))]
    pub async fn reset(&self, user_id: Uuid) -> Result<(), QuotaError> {
        let key = self.build_key(user_id, Utc::now().date_naive());
        self.redis.del::<(), _>(&key).await.map_err(|e| {
            warn!(error = %e, "Failed to reset download quota");
            QuotaError::RedisUnavailable
        })?;

        info!(user_id = %user_id, "Download quota reset");
        Ok(())
    }

    /// Start of the next UTC day.
    #[must_use]
    pub fn resets_at(now: DateTime<Utc>) -> DateTime<Utc> {
        now.date_naive()
            .succ_opt()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .map_or(now + Duration::days(1), |midnight| midnight.and_utc())
    }

    fn build_key(&self, user_id: Uuid, day: NaiveDate) -> String {
        format!(
            "{}:{}:{}",
            self.config.redis_key_prefix,
            day.format("%Y-%m-%d"),
            user_id
        )
    }
}
