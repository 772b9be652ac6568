//! Rating model — post-session feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A rating left by one session participant for the other. Every submission
/// is appended to the ratings list — resubmitting for the same session adds a
/// second entry (and both count toward the ratee's average); only the
/// session's rating pointer is overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub session_id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    /// 1–5
    pub score: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Submit a rating for a completed session. The ratee is derived as the other
/// participant, never taken from the request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRatingRequest {
    pub session_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Score must be between 1 and 5"))]
    pub score: i32,

    #[validate(length(max = 500))]
    pub comment: Option<String>,
}

/// Ratings received by a user, with the arithmetic-mean average.
/// `average` is exactly 0 when `ratings` is empty.
#[derive(Debug, Serialize)]
pub struct RatingsResponse {
    pub ratings: Vec<Rating>,
    pub average: f64,
}
