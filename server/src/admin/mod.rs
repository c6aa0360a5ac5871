//! Admin Module
//!
//! Support tools for the download quota. All routes require the admin role.

pub mod handlers;
pub mod middleware;
pub mod types;

use axum::{middleware::from_fn, routing::get, Router};

use crate::api::AppState;

pub use middleware::require_admin;
pub use types::AdminError;

/// Create the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/{user_id}/download-quota",
            get(handlers::get_user_download_quota).delete(handlers::reset_user_download_quota),
        )
        .layer(from_fn(require_admin))
}
