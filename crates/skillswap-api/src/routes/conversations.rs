//! Conversation and messaging routes.
//!
//! A conversation comes into existence with the first message between a pair
//! and is updated — never duplicated — by every later one. Listing resolves
//! the peer, inlines the last message, and derives the caller's unread count.

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    middleware,
    routing::{get, post},
};
use skillswap_common::{
    error::{SkillSwapError, SkillSwapResult},
    ids,
    models::conversation::{Conversation, ConversationSummary},
    models::message::{Message, MessageKind, SendMessageRequest},
    validation::validate_request,
};
use skillswap_db::repository::{conversations, messages, users};
use std::sync::Arc;
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};

/// Messaging routes (all require authentication).
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/messages", post(send_message))
        .route("/messages/{message_id}/read", post(mark_message_read))
        .route("/users/@me/conversations", get(list_conversations))
        .route("/conversations/with/{peer_id}", get(get_conversation_with))
        .route("/conversations/{conversation_id}/messages", get(list_conversation_messages))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

/// Deliver a message from the authenticated sender, creating the pair's
/// conversation on first contact. Shared with the call-handshake routes.
pub(crate) async fn deliver(
    state: &AppState,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: &str,
    kind: MessageKind,
) -> SkillSwapResult<Message> {
    if receiver_id == sender_id {
        return Err(SkillSwapError::Validation {
            message: "Cannot message yourself".into(),
        });
    }

    users::find_by_id(&state.db.pool, receiver_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "User".into(),
        })?;

    let message = messages::send_message(
        &state.db.pool,
        ids::generate_id(),
        ids::generate_id(),
        sender_id,
        receiver_id,
        content,
        kind,
    )
    .await?;

    tracing::info!(
        message_id = %message.id,
        sender_id = %sender_id,
        receiver_id = %receiver_id,
        kind = kind.as_str(),
        "Message sent"
    );

    Ok(message)
}

/// POST /api/v1/messages — Send a message to another user.
async fn send_message(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendMessageRequest>,
) -> SkillSwapResult<Json<Message>> {
    validate_request(&body)?;

    let kind = body.kind.unwrap_or(MessageKind::Text);
    let message = deliver(&state, auth.user_id, body.receiver_id, &body.content, kind).await?;
    Ok(Json(message))
}

/// POST /api/v1/messages/:message_id/read — Mark a received message as read.
/// Only the receiver may flip the flag; re-marking is a successful no-op.
async fn mark_message_read(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
) -> SkillSwapResult<Json<Message>> {
    let message = messages::find_by_id(&state.db.pool, message_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Message".into(),
        })?;

    if message.receiver_id != auth.user_id {
        return Err(SkillSwapError::Forbidden);
    }

    let message = messages::mark_read(&state.db.pool, message_id).await?;
    Ok(Json(message))
}

/// GET /api/v1/users/@me/conversations — The caller's conversations, most
/// recently active first.
async fn list_conversations(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
) -> SkillSwapResult<Json<Vec<ConversationSummary>>> {
    let convs = conversations::list_for_user(&state.db.pool, auth.user_id).await?;

    let mut results = Vec::with_capacity(convs.len());
    for conv in convs {
        let peer_id = conv.peer_of(auth.user_id);
        let Some(peer) = users::find_by_id(&state.db.pool, peer_id).await? else {
            continue;
        };

        let last_message = match conv.last_message_id {
            Some(id) => messages::find_by_id(&state.db.pool, id).await?,
            None => None,
        };
        let unread_count =
            conversations::unread_count(&state.db.pool, conv.id, auth.user_id).await?;

        results.push(ConversationSummary {
            id: conv.id,
            peer: peer.into(),
            last_message,
            unread_count,
            updated_at: conv.updated_at,
        });
    }

    Ok(Json(results))
}

/// GET /api/v1/conversations/with/:peer_id — The conversation between the
/// caller and a peer, if any message has ever been exchanged.
async fn get_conversation_with(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(peer_id): Path<Uuid>,
) -> SkillSwapResult<Json<Conversation>> {
    let conv = conversations::find_by_pair(&state.db.pool, auth.user_id, peer_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Conversation".into(),
        })?;
    Ok(Json(conv))
}

/// GET /api/v1/conversations/:conversation_id/messages — Every message
/// exchanged between the pair, oldest first. Participants only; anyone else
/// sees a 404.
async fn list_conversation_messages(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(conversation_id): Path<Uuid>,
) -> SkillSwapResult<Json<Vec<Message>>> {
    let conv = conversations::find_by_id(&state.db.pool, conversation_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Conversation".into(),
        })?;

    if !conv.involves(auth.user_id) {
        return Err(SkillSwapError::NotFound {
            resource: "Conversation".into(),
        });
    }

    Ok(Json(messages::list_for_conversation(&state.db.pool, conv.id).await?))
}
