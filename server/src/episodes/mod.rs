//! Episode playback and downloads.
//!
//! Episodes are looked up by UUID or slug. Every endpoint runs after
//! `auth::resolve_viewer`, so anonymous callers arrive as guests.

mod error;
mod handlers;
mod types;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::api::AppState;
use crate::auth::require_viewer_identity;

pub use error::EpisodeError;
pub use types::{
    AccessResponse, DownloadResponse, PlaybackResponse, QuotaStatus, StreamSource,
    ViewerQuotaResponse,
};

/// Routes under `/api/episodes`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id_or_slug}/access", get(handlers::get_access))
        .route("/{id_or_slug}/playback/{tier}", get(handlers::get_playback))
        .route("/{id_or_slug}/downloads/{tier}", post(handlers::create_download))
}

/// Routes under `/api/me` (accounts only).
pub fn me_router() -> Router<AppState> {
    Router::new()
        .route("/download-quota", get(handlers::get_download_quota))
        .layer(from_fn(require_viewer_identity))
}
