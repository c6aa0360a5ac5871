//! S3 Storage Client
//!
//! Download files live in an S3-compatible bucket (AWS S3, MinIO, R2, B2).
//! The server never proxies bytes; it hands out short-lived presigned URLs.

use aws_config::Region;
use aws_sdk_s3::{
    config::{Credentials, IdentityCache, SharedCredentialsProvider, StalledStreamProtectionConfig},
    presigning::PresigningConfig,
    Client,
};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

/// S3 client wrapper with configuration.
#[derive(Clone)]
pub struct S3Client {
    client: Client,
    bucket: String,
    presign_expiry: Duration,
}

/// S3-related errors.
#[derive(Debug, Error)]
pub enum S3Error {
    /// Failed to generate presigned URL.
    #[error("Failed to generate presigned URL: {0}")]
    Presign(String),

    /// S3 configuration error.
    #[error("S3 configuration error: {0}")]
    Config(String),
}

impl S3Client {
    /// Create a new S3 client from configuration.
    ///
    /// Credentials come from `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY`
    /// when both are set.
    pub fn new(config: &Config) -> Result<Self, S3Error> {
        let credentials = match (
            std::env::var("AWS_ACCESS_KEY_ID"),
            std::env::var("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Ok(access_key), Ok(secret_key)) => Some(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "environment",
            )),
            _ => None,
        };

        Self::with_credentials(config, credentials)
    }

    /// Create a client with explicit credentials.
    ///
    /// Uses path-style addressing when a custom endpoint is configured.
    pub fn with_credentials(
        config: &Config,
        credentials: Option<Credentials>,
    ) -> Result<Self, S3Error> {
        let region = Region::new(
            std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
        );

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .region(region)
            .stalled_stream_protection(StalledStreamProtectionConfig::disabled())
            .identity_cache(IdentityCache::no_cache());

        if let Some(credentials) = credentials {
            s3_config_builder =
                s3_config_builder.credentials_provider(SharedCredentialsProvider::new(credentials));
        }

        if let Some(endpoint) = &config.s3_endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint).force_path_style(true);
        }

        let expiry_secs = u64::try_from(config.s3_presign_expiry)
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| S3Error::Config("S3_PRESIGN_EXPIRY must be positive".to_string()))?;

        let client = Client::from_conf(s3_config_builder.build());

        info!(
            bucket = %config.s3_bucket,
            endpoint = ?config.s3_endpoint,
            "S3 client initialized"
        );

        Ok(Self {
            client,
            bucket: config.s3_bucket.clone(),
            presign_expiry: Duration::from_secs(expiry_secs),
        })
    }

    /// Generate a presigned URL for downloading a file.
    ///
    /// The URL is valid for the configured expiry duration.
    pub async fn presign_get(&self, key: &str) -> Result<String, S3Error> {
        let presign_config = PresigningConfig::builder()
            .expires_in(self.presign_expiry)
            .build()
            .map_err(|e| S3Error::Presign(e.to_string()))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign_config)
            .await
            .map_err(|e| S3Error::Presign(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    /// Check if the bucket is accessible (health check).
    pub async fn health_check(&self) -> Result<(), S3Error> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map_err(|e| S3Error::Config(format!("Bucket not accessible: {e}")))?;

        Ok(())
    }

    /// Presign expiry in whole seconds.
    pub const fn presign_expiry_secs(&self) -> u64 {
        self.presign_expiry.as_secs()
    }
}

/// Turns a stored download locator into a URL the client can fetch.
///
/// Without S3 the locator is returned unchanged, which is how local setups
/// serve files from a plain HTTP origin.
pub async fn resolve_download_url(s3: Option<&S3Client>, locator: &str) -> Result<String, S3Error> {
    match s3 {
        Some(client) => client.presign_get(locator).await,
        None => Ok(locator.to_string()),
    }
}
