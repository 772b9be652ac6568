//! Availability routes — publish and remove bookable slots.

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware,
    routing::{delete, post},
};
use skillswap_common::{
    error::{SkillSwapError, SkillSwapResult},
    ids,
    models::availability::{Availability, CreateAvailabilityRequest},
    validation::validate_time_range,
};
use skillswap_db::repository::availability;
use std::sync::Arc;
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};

/// Availability routes (all require authentication).
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/availability", post(add_availability))
        .route("/availability/{availability_id}", delete(delete_availability))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// POST /api/v1/availability — Publish a new slot for the caller.
async fn add_availability(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateAvailabilityRequest>,
) -> SkillSwapResult<Json<Availability>> {
    validate_time_range(&body.start_time, &body.end_time)?;

    let slot = availability::create_slot(
        &state.db.pool,
        ids::generate_id(),
        auth.user_id,
        body.date,
        &body.start_time,
        &body.end_time,
    )
    .await?;

    tracing::info!(slot_id = %slot.id, user_id = %auth.user_id, "Availability added");

    Ok(Json(slot))
}

/// DELETE /api/v1/availability/:availability_id — Remove one of the caller's
/// slots. A booked slot cannot be deleted.
async fn delete_availability(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(availability_id): Path<Uuid>,
) -> SkillSwapResult<StatusCode> {
    let slot = availability::find_by_id(&state.db.pool, availability_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Availability slot".into(),
        })?;

    if slot.user_id != auth.user_id {
        return Err(SkillSwapError::Forbidden);
    }

    // The delete itself is conditional on the slot being unbooked, so a
    // booking that lands after the lookup above still wins.
    let deleted = availability::delete_unbooked_slot(&state.db.pool, availability_id).await?;
    if !deleted {
        return Err(SkillSwapError::Conflict {
            message: "Cannot delete a booked availability slot".into(),
        });
    }

    tracing::info!(slot_id = %availability_id, user_id = %auth.user_id, "Availability removed");

    Ok(StatusCode::NO_CONTENT)
}
