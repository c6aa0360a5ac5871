//! Episode Streaming Server - Main Entry Point

use anyhow::Result;
use std::net::SocketAddr;
use tracing::info;

use vs_server::{api, config, db, quota::DownloadQuota, storage::S3Client};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vs_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        unlock_days = config.access.top_tier_unlock_days,
        daily_downloads = config.access.top_tier_daily_downloads,
        "Starting episode server"
    );

    // Initialize database
    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;

    // Initialize Redis
    let redis = db::create_redis_client(&config.redis_url).await?;

    // Initialize S3 client (optional - download locators are returned as-is without it)
    let s3 = match S3Client::new(&config) {
        Ok(client) => match client.health_check().await {
            Ok(()) => {
                info!(bucket = %config.s3_bucket, "S3 storage connected");
                Some(client)
            }
            Err(e) => {
                tracing::warn!("S3 health check failed: {}. Presigned downloads disabled.", e);
                None
            }
        },
        Err(e) => {
            tracing::warn!(
                "S3 client initialization failed: {}. Presigned downloads disabled.",
                e
            );
            None
        }
    };

    // Initialize download quota (optional)
    let quota = if config.quota.enabled {
        let mut quota = DownloadQuota::new(redis.clone(), config.quota.clone());
        match quota.init().await {
            Ok(()) => {
                info!("Download quota initialized");
                Some(quota)
            }
            Err(e) if config.quota.fail_open => {
                tracing::warn!("Download quota initialization failed: {}. Downloads unmetered.", e);
                None
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        info!("Download quota disabled by configuration");
        None
    };

    // Build application state
    let state = api::AppState::new(db_pool, redis, config.clone(), s3, quota);

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    info!("Server shutdown complete");

    Ok(())
}
