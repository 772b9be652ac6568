//! Authentication routes — register, login, refresh.

use axum::{Json, Router, extract::State, routing::post};
use skillswap_common::{
    error::{SkillSwapError, SkillSwapResult},
    ids,
    models::user::{CreateUserRequest, LoginRequest, UserResponse},
    validation::validate_request,
};
use skillswap_db::repository::users;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    AppState,
    auth::{self, TokenKind, TokenPair},
};

/// Auth router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
}

#[derive(Serialize)]
struct AuthResponse {
    user: UserResponse,
    #[serde(flatten)]
    tokens: TokenPair,
}

/// POST /api/v1/auth/register
///
/// Create a new account. Returns the profile + JWT tokens. The new user
/// starts with empty teach/learn lists and no availability.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserRequest>,
) -> SkillSwapResult<Json<AuthResponse>> {
    validate_request(&body)?;

    if body.password != body.confirm_password {
        return Err(SkillSwapError::Validation {
            message: "Passwords don't match".into(),
        });
    }

    // Check email availability
    if users::find_by_email(&state.db.pool, &body.email)
        .await?
        .is_some()
    {
        return Err(SkillSwapError::AlreadyExists {
            resource: "Email".into(),
        });
    }

    // Hash password with Argon2id
    let password_hash = auth::hash_password(&body.password)?;

    let user = users::create_user(
        &state.db.pool,
        ids::generate_id(),
        &body.name,
        &body.email,
        &password_hash,
        body.bio.as_deref().unwrap_or(""),
        body.location.as_deref().unwrap_or(""),
        body.avatar.as_deref(),
    )
    .await?;

    let config = skillswap_common::config::get();
    let tokens = auth::generate_token_pair(&user, &config.auth)?;

    tracing::info!(user_id = %user.id, name = %user.name, "New user registered");

    Ok(Json(AuthResponse {
        user: user.into(),
        tokens,
    }))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns JWT tokens.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> SkillSwapResult<Json<AuthResponse>> {
    validate_request(&body)?;

    let user = users::find_by_email(&state.db.pool, &body.email)
        .await?
        .ok_or(SkillSwapError::InvalidCredentials)?;

    if !auth::verify_password(&body.password, &user.password_hash) {
        return Err(SkillSwapError::InvalidCredentials);
    }

    let config = skillswap_common::config::get();
    let tokens = auth::generate_token_pair(&user, &config.auth)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: user.into(),
        tokens,
    }))
}

/// POST /api/v1/auth/refresh
///
/// Exchange a refresh token for a new token pair.
async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> SkillSwapResult<Json<TokenPair>> {
    let config = skillswap_common::config::get();

    let claims = auth::validate_token(&body.refresh_token, &config.auth.jwt_secret, TokenKind::Refresh)?;

    // Verify the account still exists
    let user = users::find_by_id(&state.db.pool, claims.user_id()?)
        .await?
        .ok_or(SkillSwapError::InvalidToken)?;

    let tokens = auth::generate_token_pair(&user, &config.auth)?;

    Ok(Json(tokens))
}

#[derive(serde::Deserialize)]
struct RefreshRequest {
    refresh_token: String,
}
