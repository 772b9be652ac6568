//! Conversation model — the thread between an unordered pair of users.
//!
//! The pair is stored canonicalized (lexicographically low/high), so "at most
//! one conversation per pair" is a schema-level invariant rather than a scan.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::message::Message;
use super::user::UserResponse;

/// A conversation between exactly two users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,

    /// Smaller participant id of the canonical pair
    pub user_low: Uuid,

    /// Larger participant id of the canonical pair
    pub user_high: Uuid,

    /// Most recent message in this conversation
    pub last_message_id: Option<Uuid>,

    /// Bumped on every send
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Both participants, in canonical order.
    pub fn participants(&self) -> [Uuid; 2] {
        [self.user_low, self.user_high]
    }

    pub fn involves(&self, user_id: Uuid) -> bool {
        self.user_low == user_id || self.user_high == user_id
    }

    /// The participant that isn't `user_id`. Callers must check
    /// [`involves`](Self::involves) first.
    pub fn peer_of(&self, user_id: Uuid) -> Uuid {
        if self.user_low == user_id {
            self.user_high
        } else {
            self.user_low
        }
    }
}

/// Canonicalize an unordered participant pair.
pub fn canonical_pair(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Conversation as listed for one participant: the peer resolved, the last
/// message inlined, and the caller's unread count.
#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub peer: UserResponse,
    pub last_message: Option<Message>,
    pub unread_count: i64,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_pair_is_order_independent() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        assert_eq!(canonical_pair(a, b), canonical_pair(b, a));
    }

    #[test]
    fn peer_of_returns_the_other_participant() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let (low, high) = canonical_pair(a, b);
        let conv = Conversation {
            id: Uuid::now_v7(),
            user_low: low,
            user_high: high,
            last_message_id: None,
            updated_at: chrono::Utc::now(),
        };
        assert_eq!(conv.peer_of(a), b);
        assert_eq!(conv.peer_of(b), a);
    }
}
