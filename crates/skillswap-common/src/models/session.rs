//! Session model — a confirmed booking between a host and a guest.
//!
//! A session pins one availability slot and one skill. Status moves one way:
//! scheduled → completed or cancelled, both terminal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A booked skill-swap session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,

    /// The availability slot this session was booked against
    pub availability_id: Uuid,

    /// Owner of the slot
    pub host_id: Uuid,

    /// The user who booked
    pub guest_id: Uuid,

    /// The skill the guest wants to learn from the host
    pub skill_id: Uuid,

    pub date: NaiveDate,

    pub start_time: String,

    pub end_time: String,

    pub is_video_call: bool,

    pub status: SessionStatus,

    /// Most recent rating submitted for this session (last write wins here;
    /// the ratings table keeps every submission)
    pub rating_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "scheduled" => Self::Scheduled,
            "completed" => Self::Completed,
            "cancelled" => Self::Cancelled,
            _ => return None,
        })
    }

    /// Completed and cancelled are terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Scheduled)
    }
}

/// Book a session against an availability slot. The guest is the caller; the
/// host, date, and times come from the slot itself.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub availability_id: Uuid,
    pub skill_id: Uuid,
    #[serde(default)]
    pub is_video_call: bool,
}

/// Move a session out of `scheduled`.
#[derive(Debug, Deserialize)]
pub struct UpdateSessionStatusRequest {
    pub status: SessionStatus,
}
