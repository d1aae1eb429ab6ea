/// Capacity limit routes
///
/// The UI checks these before offering signup or add-album; the caps
/// are still enforced server-side on the write paths.
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, Json};
use serde::Serialize;
use soundmark_storage::{entries, users};

#[derive(Debug, Serialize)]
pub struct UserLimitsResponse {
    pub can_signup: bool,
    pub current_count: i64,
    pub max_users: i64,
}

#[derive(Debug, Serialize)]
pub struct AlbumLimitsResponse {
    pub can_add: bool,
    pub current_count: i64,
    pub max_albums: i64,
    pub remaining: i64,
}

/// GET /api/limits/users (public; the signup page calls it)
pub async fn user_limits(State(app_state): State<AppState>) -> Result<Json<UserLimitsResponse>> {
    let current_count = users::count(&app_state.pool).await?;
    let max_users = app_state.limits.max_users;

    Ok(Json(UserLimitsResponse {
        can_signup: current_count < max_users,
        current_count,
        max_users,
    }))
}

/// GET /api/limits/albums
pub async fn album_limits(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<AlbumLimitsResponse>> {
    let current_count = entries::count_for_user(&app_state.pool, auth.user_id()).await?;
    let max_albums = app_state.limits.max_albums_per_user;

    Ok(Json(AlbumLimitsResponse {
        can_add: current_count < max_albums,
        current_count,
        max_albums,
        remaining: (max_albums - current_count).max(0),
    }))
}
