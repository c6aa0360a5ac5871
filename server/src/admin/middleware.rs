//! Admin authorization middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use vs_common::ViewerRole;

use super::types::AdminError;
use crate::auth::CurrentViewer;

/// Middleware that requires the viewer to be an admin.
///
/// Must run after `auth::resolve_viewer`. Moderators are not admins.
#[tracing::instrument(skip(request, next))]
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AdminError> {
    let is_admin = request
        .extensions()
        .get::<CurrentViewer>()
        .is_some_and(|current| current.0.role == ViewerRole::Admin);

    if !is_admin {
        return Err(AdminError::NotAdmin);
    }

    Ok(next.run(request).await)
}
