//! Skill model — the catalog unit.
//!
//! Every skill lives once in the global catalog, owned by the user who
//! created it. Per-user teach/learn membership is an association (see the
//! `user_skills` table), never an embedded copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A catalog skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: Uuid,

    /// User who created the catalog entry
    pub owner_id: Uuid,

    pub name: String,

    pub category: SkillCategory,

    pub description: String,

    pub level: SkillLevel,

    /// Cover image URL (defaulted from the skill name when not provided)
    pub image: String,

    pub created_at: DateTime<Utc>,
}

/// The ten fixed skill categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technology,
    Art,
    Language,
    Music,
    Cooking,
    Sports,
    Academics,
    Business,
    Crafts,
    Other,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Art => "art",
            Self::Language => "language",
            Self::Music => "music",
            Self::Cooking => "cooking",
            Self::Sports => "sports",
            Self::Academics => "academics",
            Self::Business => "business",
            Self::Crafts => "crafts",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "technology" => Self::Technology,
            "art" => Self::Art,
            "language" => Self::Language,
            "music" => Self::Music,
            "cooking" => Self::Cooking,
            "sports" => Self::Sports,
            "academics" => Self::Academics,
            "business" => Self::Business,
            "crafts" => Self::Crafts,
            "other" => Self::Other,
            _ => return None,
        })
    }
}

/// Self-assessed proficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            "expert" => Self::Expert,
            _ => return None,
        })
    }
}

/// Which of a user's lists a skill is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    Teach,
    Learn,
}

impl SkillKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teach => "teach",
            Self::Learn => "learn",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "teach" => Self::Teach,
            "learn" => Self::Learn,
            _ => return None,
        })
    }
}

/// Create a catalog skill and attach it to the caller's teach or learn list.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSkillRequest {
    #[validate(length(min = 1, max = 80, message = "Skill name must be 1-80 characters"))]
    pub name: String,

    pub category: SkillCategory,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub level: SkillLevel,

    /// Which list the new skill goes on
    pub kind: SkillKind,

    pub image: Option<String>,
}

/// Attach an existing catalog skill to the caller's teach or learn list.
#[derive(Debug, Deserialize)]
pub struct AttachSkillRequest {
    pub kind: SkillKind,
}

/// Stock cover image for skills created without one.
pub fn default_image(skill_name: &str) -> String {
    let keyword = skill_name
        .split_whitespace()
        .next()
        .unwrap_or("skill")
        .to_lowercase();
    format!("https://source.unsplash.com/random/800x600/?{keyword}")
}
