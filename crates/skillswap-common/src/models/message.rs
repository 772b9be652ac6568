//! Message model — the unit of a conversation.
//!
//! Messages are immutable once sent, except for the read flag, which only
//! ever transitions false → true (and only matters to the receiver). The
//! video-call handshake rides on the same channel as tagged message kinds —
//! there is no separate signaling transport.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A direct message between two users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,

    /// Conversation this message belongs to
    pub conversation_id: Uuid,

    pub sender_id: Uuid,

    pub receiver_id: Uuid,

    pub content: String,

    pub kind: MessageKind,

    /// Whether the receiver has read this message (false → true only)
    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

/// Message kinds. The three `video_*` variants carry the simulated call
/// handshake: idle → request-sent on `video_request`, then accepted or
/// rejected by the peer's reply. A request the peer never answers simply
/// dangles — there is no timeout kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    VideoRequest,
    VideoAccepted,
    VideoRejected,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::VideoRequest => "video_request",
            Self::VideoAccepted => "video_accepted",
            Self::VideoRejected => "video_rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "text" => Self::Text,
            "video_request" => Self::VideoRequest,
            "video_accepted" => Self::VideoAccepted,
            "video_rejected" => Self::VideoRejected,
            _ => return None,
        })
    }
}

/// Send a message to another user.
#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,

    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,

    /// Defaults to `text`
    pub kind: Option<MessageKind>,
}
