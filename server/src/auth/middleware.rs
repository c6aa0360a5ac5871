//! Authentication Middleware

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;
use vs_common::Viewer;

use crate::api::AppState;
use crate::db::find_profile_by_id;

use super::error::AuthError;
use super::jwt::validate_access_token;

/// Viewer resolved for the current request.
///
/// Inserted into request extensions by [`resolve_viewer`].
#[derive(Debug, Clone, Copy)]
pub struct CurrentViewer(pub Viewer);

/// Middleware that identifies the caller.
///
/// - No `Authorization` header: the request continues as a guest.
/// - A bearer token: validated, then the profile is loaded for role and
///   premium status.
/// - A malformed header, bad token or unknown account: rejected with 401,
///   never downgraded to guest.
pub async fn resolve_viewer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // The header borrow must end before the first await.
    let user_id = match bearer_token(request.headers())? {
        None => None,
        Some(token) => {
            let claims = validate_access_token(token, &state.config.jwt_public_key)?;
            Some(claims.sub.parse::<Uuid>().map_err(|_| AuthError::InvalidToken)?)
        }
    };

    let viewer = match user_id {
        None => Viewer::guest(),
        Some(user_id) => find_profile_by_id(&state.db, user_id)
            .await?
            .ok_or(AuthError::UnknownAccount)?
            .viewer(),
    };

    tracing::debug!(role = viewer.role.as_str(), premium = viewer.is_premium, "Viewer resolved");
    request.extensions_mut().insert(CurrentViewer(viewer));

    Ok(next.run(request).await)
}

/// Middleware that rejects guests. Must run after [`resolve_viewer`].
pub async fn require_viewer_identity(
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let signed_in = request
        .extensions()
        .get::<CurrentViewer>()
        .is_some_and(|current| !current.0.is_guest());

    if !signed_in {
        return Err(AuthError::LoginRequired);
    }

    Ok(next.run(request).await)
}

/// Extracts the bearer token, if an `Authorization` header is present.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(Some)
        .ok_or(AuthError::InvalidAuthHeader)
}

/// Extractor for the resolved viewer in handlers.
///
/// Falls back to a guest when [`resolve_viewer`] did not run.
impl<S> FromRequestParts<S> for CurrentViewer
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .copied()
            .unwrap_or(Self(Viewer::guest())))
    }
}
