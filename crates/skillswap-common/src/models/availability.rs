//! Availability model — a bookable time window offered by a user.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An availability slot. `is_booked` flips false → true exactly once, when a
/// session is created against the slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub id: Uuid,

    /// Slot owner (the would-be session host)
    pub user_id: Uuid,

    pub date: NaiveDate,

    /// "HH:MM", 24-hour
    pub start_time: String,

    /// "HH:MM", 24-hour
    pub end_time: String,

    pub is_booked: bool,

    /// Guest the slot was booked with, once booked
    pub booked_with: Option<Uuid>,

    pub created_at: DateTime<Utc>,
}

/// Publish a new availability slot.
#[derive(Debug, Deserialize)]
pub struct CreateAvailabilityRequest {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
}
