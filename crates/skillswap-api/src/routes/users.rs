//! User routes — profile management, roster browsing.
//!
//! Profiles are assembled at read time: teach/learn lists come from the
//! catalog joins, availability from the scheduling store, and the rating
//! average from the ratings store. Nothing is denormalized onto the user row.

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    middleware,
    routing::get,
};
use skillswap_common::{
    error::{SkillSwapError, SkillSwapResult},
    models::skill::SkillKind,
    models::user::{UpdateUserRequest, User, UserProfileResponse, UserResponse},
    validation::validate_request,
};
use skillswap_db::repository::{availability, ratings, skills, users};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};

/// User routes (all require authentication).
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/@me", get(get_current_user).patch(update_current_user))
        .route("/users/{user_id}", get(get_user))
        .route("/users/{user_id}/availability", get(get_user_availability))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

#[derive(Debug, Deserialize)]
struct ListUsersQuery {
    /// Substring match against name or location
    q: Option<String>,
}

/// Resolve everything the profile view needs from the other stores.
pub(crate) async fn profile_response(
    state: &AppState,
    user: User,
) -> SkillSwapResult<UserProfileResponse> {
    let skills_to_teach = skills::list_user_skills(&state.db.pool, user.id, SkillKind::Teach).await?;
    let skills_to_learn = skills::list_user_skills(&state.db.pool, user.id, SkillKind::Learn).await?;
    let availability = availability::list_for_user(&state.db.pool, user.id).await?;
    let average_rating = ratings::average_received(&state.db.pool, user.id).await?;

    Ok(UserProfileResponse {
        user: user.into(),
        skills_to_teach,
        skills_to_learn,
        availability,
        average_rating,
    })
}

/// GET /api/v1/users — Browse the roster, optionally filtered.
async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> SkillSwapResult<Json<Vec<UserResponse>>> {
    let found = users::list_users(&state.db.pool, query.q.as_deref()).await?;
    Ok(Json(found.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/v1/users/@me — The authenticated user's full profile.
async fn get_current_user(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> SkillSwapResult<Json<UserProfileResponse>> {
    let user = users::find_by_id(&state.db.pool, auth.user_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "User".into(),
        })?;

    Ok(Json(profile_response(&state, user).await?))
}

/// PATCH /api/v1/users/@me — Update the authenticated user's profile.
/// Absent fields keep their current value.
async fn update_current_user(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateUserRequest>,
) -> SkillSwapResult<Json<UserResponse>> {
    validate_request(&body)?;

    let user = users::update_user(
        &state.db.pool,
        auth.user_id,
        body.name.as_deref(),
        body.bio.as_deref(),
        body.location.as_deref(),
        body.avatar.as_deref(),
    )
    .await?;

    tracing::info!(user_id = %user.id, "Profile updated");

    Ok(Json(user.into()))
}

/// GET /api/v1/users/:user_id — A user's full public profile.
async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> SkillSwapResult<Json<UserProfileResponse>> {
    let user = users::find_by_id(&state.db.pool, user_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "User".into(),
        })?;

    Ok(Json(profile_response(&state, user).await?))
}

/// GET /api/v1/users/:user_id/availability — A user's bookable slots.
async fn get_user_availability(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> SkillSwapResult<Json<Vec<skillswap_common::models::availability::Availability>>> {
    users::find_by_id(&state.db.pool, user_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "User".into(),
        })?;

    Ok(Json(availability::list_for_user(&state.db.pool, user_id).await?))
}
