//! Video-call handshake routes.
//!
//! The handshake is simulated signaling: each step is an ordinary message
//! with a tagged kind and a fixed prompt, riding the same conversation as
//! text chat. The observable state machine is idle → request-sent on
//! initiate, then accepted or rejected by the peer's reply; an unanswered
//! request simply dangles. No peer connection is negotiated here.

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    middleware,
    routing::post,
};
use skillswap_common::{
    error::SkillSwapResult,
    models::message::{Message, MessageKind},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext, routes::conversations::deliver};

const VIDEO_REQUEST_PROMPT: &str = "Would you like to join a video call?";
const VIDEO_ACCEPTED_PROMPT: &str = "Video call accepted. Joining now...";
const VIDEO_REJECTED_PROMPT: &str = "Can't join a video call right now.";

/// Call-handshake router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/calls/{peer_id}/initiate", post(initiate_call))
        .route("/calls/{peer_id}/accept", post(accept_call))
        .route("/calls/{peer_id}/reject", post(reject_call))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// POST /api/v1/calls/:peer_id/initiate — Ask the peer to join a call.
async fn initiate_call(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(peer_id): Path<Uuid>,
) -> SkillSwapResult<Json<Message>> {
    let message = deliver(
        &state,
        auth.user_id,
        peer_id,
        VIDEO_REQUEST_PROMPT,
        MessageKind::VideoRequest,
    )
    .await?;

    tracing::info!(caller = %auth.user_id, peer = %peer_id, "Video call requested");
    Ok(Json(message))
}

/// POST /api/v1/calls/:peer_id/accept — Accept the peer's call request.
async fn accept_call(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(peer_id): Path<Uuid>,
) -> SkillSwapResult<Json<Message>> {
    let message = deliver(
        &state,
        auth.user_id,
        peer_id,
        VIDEO_ACCEPTED_PROMPT,
        MessageKind::VideoAccepted,
    )
    .await?;

    tracing::info!(caller = %auth.user_id, peer = %peer_id, "Video call accepted");
    Ok(Json(message))
}

/// POST /api/v1/calls/:peer_id/reject — Decline the peer's call request.
async fn reject_call(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(peer_id): Path<Uuid>,
) -> SkillSwapResult<Json<Message>> {
    let message = deliver(
        &state,
        auth.user_id,
        peer_id,
        VIDEO_REJECTED_PROMPT,
        MessageKind::VideoRejected,
    )
    .await?;

    tracing::info!(caller = %auth.user_id, peer = %peer_id, "Video call rejected");
    Ok(Json(message))
}
