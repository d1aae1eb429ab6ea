/// Authentication API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use soundmark_core::types::User;
use soundmark_storage::users;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair plus the account, returned by both signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
}

const MIN_PASSWORD_LENGTH: usize = 8;

/// POST /api/auth/signup
///
/// Creates the account and signs it in immediately. Rejected when the
/// beta user cap is reached, the email is taken, or the password is too
/// short.
pub async fn signup(
    State(app_state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>> {
    let email = req.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(ServerError::BadRequest(
            "A valid email is required".to_string(),
        ));
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ServerError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    let max_users = app_state.limits.max_users;
    if users::count(&app_state.pool).await? >= max_users {
        return Err(ServerError::Capacity(format!(
            "Beta is full ({max_users} user limit reached)"
        )));
    }

    if users::get_by_email(&app_state.pool, &email).await?.is_some() {
        return Err(ServerError::BadRequest(
            "Email already registered".to_string(),
        ));
    }

    let user = User::new(email);
    users::create(&app_state.pool, &user).await?;

    let password_hash = app_state.auth_service.hash_password(&req.password)?;
    users::set_password_hash(&app_state.pool, &user.id, &password_hash).await?;

    tracing::info!("New account: {}", user.email);

    token_response(&app_state, user)
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let invalid = || ServerError::Auth("Invalid email or password".to_string());

    let user = users::get_by_email(&app_state.pool, req.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_hash = users::get_password_hash(&app_state.pool, &user.id)
        .await?
        .ok_or_else(invalid)?;

    if !app_state
        .auth_service
        .verify_password(&req.password, &password_hash)?
    {
        return Err(invalid());
    }

    token_response(&app_state, user)
}

/// POST /api/auth/refresh
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    // Verify refresh token
    let user_id = app_state
        .auth_service
        .verify_refresh_token(&req.refresh_token)?;

    // Create new access token
    let access_token = app_state.auth_service.create_access_token(&user_id)?;

    Ok(Json(RefreshResponse {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}

fn token_response(app_state: &AppState, user: User) -> Result<Json<AuthResponse>> {
    let access_token = app_state.auth_service.create_access_token(&user.id)?;
    let refresh_token = app_state.auth_service.create_refresh_token(&user.id)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        user,
    }))
}
