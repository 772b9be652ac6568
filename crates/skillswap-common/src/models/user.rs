//! User model — the identity layer.
//!
//! A SkillSwap account is a public teaching/learning profile: name, bio,
//! location, avatar. Skills and availability are *not* embedded on the user
//! record — they live in the catalog and availability tables and are resolved
//! at read time, so a profile can never drift out of sync with the
//! source-of-truth rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::availability::Availability;
use super::skill::Skill;

/// A SkillSwap user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID v7 — time-sortable)
    pub id: Uuid,

    /// Display name shown on the profile and in search
    pub name: String,

    /// Login email (unique, case-insensitive)
    #[serde(skip_serializing)]
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Short bio / about me
    pub bio: String,

    /// Free-form location ("Berlin", "UTC-5", ...)
    pub location: String,

    /// Avatar image URL
    pub avatar: Option<String>,

    /// Account creation timestamp
    pub joined_at: DateTime<Utc>,

    /// Last profile update
    pub updated_at: DateTime<Utc>,
}

/// Registration request.
///
/// The confirm-password check is part of the server contract: a mismatch is a
/// validation failure, not a client-side nicety.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,

    pub confirm_password: String,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(length(max = 120))]
    pub location: Option<String>,

    pub avatar: Option<String>,
}

/// Login request — email + password.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Update profile request — absent fields keep their current value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: Option<String>,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(length(max = 120))]
    pub location: Option<String>,

    pub avatar: Option<String>,
}

/// Safe user representation for API responses (no sensitive fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub bio: String,
    pub location: String,
    pub avatar: Option<String>,
    pub joined_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            bio: u.bio,
            location: u.location,
            avatar: u.avatar,
            joined_at: u.joined_at,
        }
    }
}

/// Full profile view: the user plus everything resolved from the other
/// stores — teach/learn skill lists, availability, and the received-rating
/// average (0 when unrated).
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub skills_to_teach: Vec<Skill>,
    pub skills_to_learn: Vec<Skill>,
    pub availability: Vec<Availability>,
    pub average_rating: f64,
}
