//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).

use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::models::{Episode, Profile};

/// Log and return a database error with context.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

/// Find a viewer profile by account ID.
pub async fn find_profile_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Profile>> {
    sqlx::query_as::<_, Profile>(
        "SELECT id, username, display_name, role, feature_flags, created_at FROM users WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(db_error!("find_profile_by_id", user_id = %id))
}

/// Find an episode by ID.
pub async fn find_episode_by_id(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<Episode>> {
    sqlx::query_as::<_, Episode>("SELECT * FROM episodes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_episode_by_id", episode_id = %id))
}

/// Find an episode by slug.
pub async fn find_episode_by_slug(pool: &PgPool, slug: &str) -> sqlx::Result<Option<Episode>> {
    sqlx::query_as::<_, Episode>("SELECT * FROM episodes WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
        .map_err(db_error!("find_episode_by_slug", slug = %slug))
}

/// Find an episode by UUID or, failing that, by slug.
pub async fn find_episode(pool: &PgPool, id_or_slug: &str) -> sqlx::Result<Option<Episode>> {
    match id_or_slug.parse::<Uuid>() {
        Ok(id) => find_episode_by_id(pool, id).await,
        Err(_) => find_episode_by_slug(pool, id_or_slug).await,
    }
}
