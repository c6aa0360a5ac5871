//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{extract::State, middleware::from_fn_with_state, routing::get, Json, Router};
use fred::interfaces::ClientLike;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{admin, auth, config::Config, episodes, quota::DownloadQuota, storage::S3Client};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Redis client
    pub redis: fred::clients::Client,
    /// Server configuration
    pub config: Arc<Config>,
    /// S3 client for presigned downloads (optional)
    pub s3: Option<S3Client>,
    /// Daily top-tier download counter (optional, uses Redis)
    pub quota: Option<DownloadQuota>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        db: PgPool,
        redis: fred::clients::Client,
        config: Config,
        s3: Option<S3Client>,
        quota: Option<DownloadQuota>,
    ) -> Self {
        Self {
            db,
            redis,
            config: Arc::new(config),
            s3,
            quota,
        }
    }

    /// Check if S3 storage is configured and available.
    #[must_use]
    pub const fn has_s3(&self) -> bool {
        self.s3.is_some()
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Every API route sees a viewer; guests included.
    let api_routes = Router::new()
        .nest("/api/episodes", episodes::router())
        .nest("/api/me", episodes::me_router())
        .nest("/api/admin", admin::router())
        .layer(from_fn_with_state(state.clone(), auth::resolve_viewer));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        .merge(api_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        // State
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Whether the Redis connection is up
    redis: bool,
    /// Whether top-tier downloads are metered
    download_quota: bool,
    /// Whether downloads are served through presigned S3 URLs
    object_storage: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        redis: state.redis.is_connected(),
        download_quota: state.quota.is_some(),
        object_storage: state.has_s3(),
    })
}
