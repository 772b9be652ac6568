//! Rating routes — post-session feedback and the received-ratings view.

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    middleware,
    routing::{get, post},
};
use skillswap_common::{
    error::{SkillSwapError, SkillSwapResult},
    ids,
    models::rating::{CreateRatingRequest, Rating, RatingsResponse},
    models::session::SessionStatus,
    validation::validate_request,
};
use skillswap_db::repository::{ratings, sessions, users};
use std::sync::Arc;
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};

/// Rating routes (all require authentication).
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ratings", post(add_rating))
        .route("/users/{user_id}/ratings", get(get_user_ratings))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// POST /api/v1/ratings — Rate the other participant of a completed session.
/// Every submission is appended; the session's rating pointer moves to the
/// newest one.
async fn add_rating(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateRatingRequest>,
) -> SkillSwapResult<Json<Rating>> {
    validate_request(&body)?;

    let session = sessions::find_by_id(&state.db.pool, body.session_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Session".into(),
        })?;

    if session.host_id != auth.user_id && session.guest_id != auth.user_id {
        return Err(SkillSwapError::Forbidden);
    }

    if session.status != SessionStatus::Completed {
        return Err(SkillSwapError::Conflict {
            message: "Only completed sessions can be rated".into(),
        });
    }

    // The ratee is the other participant
    let to_user_id = if session.host_id == auth.user_id {
        session.guest_id
    } else {
        session.host_id
    };

    let rating = ratings::add_rating(
        &state.db.pool,
        ids::generate_id(),
        session.id,
        auth.user_id,
        to_user_id,
        body.score,
        body.comment.as_deref().unwrap_or(""),
    )
    .await?;

    tracing::info!(
        rating_id = %rating.id,
        session_id = %session.id,
        score = rating.score,
        "Rating submitted"
    );

    Ok(Json(rating))
}

/// GET /api/v1/users/:user_id/ratings — Ratings a user has received, with
/// the arithmetic-mean average (0 when unrated).
async fn get_user_ratings(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> SkillSwapResult<Json<RatingsResponse>> {
    users::find_by_id(&state.db.pool, user_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "User".into(),
        })?;

    let received = ratings::list_received(&state.db.pool, user_id).await?;
    let average = ratings::average_received(&state.db.pool, user_id).await?;

    Ok(Json(RatingsResponse {
        ratings: received,
        average,
    }))
}
