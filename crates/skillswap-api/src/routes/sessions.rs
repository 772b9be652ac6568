//! Session routes — booking and the status machine.

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    middleware,
    routing::{get, patch, post},
};
use skillswap_common::{
    error::{SkillSwapError, SkillSwapResult},
    ids,
    models::session::{
        CreateSessionRequest, Session, SessionStatus, UpdateSessionStatusRequest,
    },
};
use skillswap_db::repository::{availability, sessions, skills};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};

/// Session routes (all require authentication).
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{session_id}/status", patch(update_session_status))
        .route("/users/@me/sessions", get(list_my_sessions))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// POST /api/v1/sessions — Book an availability slot. The caller becomes the
/// guest; the host, date, and times come from the slot.
async fn create_session(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSessionRequest>,
) -> SkillSwapResult<Json<Session>> {
    let slot = availability::find_by_id(&state.db.pool, body.availability_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Availability slot".into(),
        })?;

    if slot.user_id == auth.user_id {
        return Err(SkillSwapError::Validation {
            message: "Cannot book your own availability".into(),
        });
    }

    skills::find_by_id(&state.db.pool, body.skill_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Skill".into(),
        })?;

    let session = sessions::book_session(
        &state.db.pool,
        ids::generate_id(),
        &slot,
        auth.user_id,
        body.skill_id,
        body.is_video_call,
    )
    .await?
    .ok_or(SkillSwapError::Conflict {
        message: "Availability slot is already booked".into(),
    })?;

    tracing::info!(
        session_id = %session.id,
        host_id = %session.host_id,
        guest_id = %session.guest_id,
        "Session scheduled"
    );

    Ok(Json(session))
}

/// PATCH /api/v1/sessions/:session_id/status — Complete or cancel a
/// scheduled session. Transitions are one-way; terminal states reject
/// further updates.
async fn update_session_status(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<UpdateSessionStatusRequest>,
) -> SkillSwapResult<Json<Session>> {
    if body.status == SessionStatus::Scheduled {
        return Err(SkillSwapError::Validation {
            message: "Status must be completed or cancelled".into(),
        });
    }

    let session = sessions::find_by_id(&state.db.pool, session_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Session".into(),
        })?;

    if session.host_id != auth.user_id && session.guest_id != auth.user_id {
        return Err(SkillSwapError::Forbidden);
    }

    if session.status.is_terminal() {
        return Err(SkillSwapError::Conflict {
            message: format!("Session is already {}", session.status.as_str()),
        });
    }

    let session = sessions::update_status(&state.db.pool, session_id, body.status)
        .await?
        .ok_or(SkillSwapError::Conflict {
            message: "Session is no longer scheduled".into(),
        })?;

    tracing::info!(session_id = %session.id, status = session.status.as_str(), "Session status updated");

    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
struct ListSessionsQuery {
    status: Option<SessionStatus>,
}

/// GET /api/v1/users/@me/sessions — Sessions where the caller is host or
/// guest, optionally filtered by status (upcoming = scheduled, past =
/// completed/cancelled).
async fn list_my_sessions(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSessionsQuery>,
) -> SkillSwapResult<Json<Vec<Session>>> {
    let found = sessions::list_for_user(&state.db.pool, auth.user_id, query.status).await?;
    Ok(Json(found))
}
