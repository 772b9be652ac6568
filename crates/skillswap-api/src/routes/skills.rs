//! Skill catalog routes — create, browse, attach, delete.

use axum::{
    Json, Router,
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use skillswap_common::{
    error::{SkillSwapError, SkillSwapResult},
    ids,
    models::skill::{
        AttachSkillRequest, CreateSkillRequest, Skill, SkillCategory, default_image,
    },
    validation::validate_request,
};
use skillswap_db::repository::skills;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{AppState, middleware::AuthContext};

/// Skill routes (all require authentication).
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/skills", get(list_skills).post(create_skill))
        .route("/skills/{skill_id}", get(get_skill).delete(delete_skill))
        .route("/skills/{skill_id}/attach", post(attach_skill))
        .route_layer(middleware::from_fn(crate::middleware::auth_middleware))
}

#[derive(Debug, Deserialize)]
struct ListSkillsQuery {
    /// Substring match against name or description
    q: Option<String>,
    category: Option<SkillCategory>,
}

/// GET /api/v1/skills — Browse the catalog.
async fn list_skills(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSkillsQuery>,
) -> SkillSwapResult<Json<Vec<Skill>>> {
    let found = skills::list_skills(&state.db.pool, query.q.as_deref(), query.category).await?;
    Ok(Json(found))
}

/// POST /api/v1/skills — Create a catalog skill owned by the caller and
/// attach it to their teach or learn list in the same operation.
async fn create_skill(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSkillRequest>,
) -> SkillSwapResult<Json<Skill>> {
    validate_request(&body)?;

    let image = body.image.unwrap_or_else(|| default_image(&body.name));
    let skill = skills::create_skill(
        &state.db.pool,
        ids::generate_id(),
        auth.user_id,
        &body.name,
        body.category,
        body.description.as_deref().unwrap_or(""),
        body.level,
        &image,
    )
    .await?;

    skills::attach_to_user(&state.db.pool, auth.user_id, skill.id, body.kind).await?;

    tracing::info!(skill_id = %skill.id, user_id = %auth.user_id, name = %skill.name, "Skill added");

    Ok(Json(skill))
}

/// GET /api/v1/skills/:skill_id — Catalog lookup.
async fn get_skill(
    State(state): State<Arc<AppState>>,
    Path(skill_id): Path<Uuid>,
) -> SkillSwapResult<Json<Skill>> {
    let skill = skills::find_by_id(&state.db.pool, skill_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Skill".into(),
        })?;
    Ok(Json(skill))
}

/// POST /api/v1/skills/:skill_id/attach — Attach an existing catalog skill
/// to the caller's teach or learn list.
async fn attach_skill(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(skill_id): Path<Uuid>,
    Json(body): Json<AttachSkillRequest>,
) -> SkillSwapResult<Json<Skill>> {
    let skill = skills::find_by_id(&state.db.pool, skill_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Skill".into(),
        })?;

    let attached = skills::attach_to_user(&state.db.pool, auth.user_id, skill.id, body.kind).await?;
    if !attached {
        return Err(SkillSwapError::AlreadyExists {
            resource: "Skill attachment".into(),
        });
    }

    tracing::info!(skill_id = %skill.id, user_id = %auth.user_id, kind = body.kind.as_str(), "Skill attached to profile");

    Ok(Json(skill))
}

/// DELETE /api/v1/skills/:skill_id — Remove the skill from the caller's
/// teach and learn lists, and from the catalog when the caller owns it.
/// Skills owned by other users stay in the catalog.
async fn delete_skill(
    Extension(auth): Extension<AuthContext>,
    State(state): State<Arc<AppState>>,
    Path(skill_id): Path<Uuid>,
) -> SkillSwapResult<StatusCode> {
    skills::find_by_id(&state.db.pool, skill_id)
        .await?
        .ok_or(SkillSwapError::NotFound {
            resource: "Skill".into(),
        })?;

    skills::detach_from_user(&state.db.pool, auth.user_id, skill_id).await?;
    let removed = skills::delete_catalog_entry(&state.db.pool, skill_id, auth.user_id).await?;

    tracing::info!(
        skill_id = %skill_id,
        user_id = %auth.user_id,
        catalog_removed = removed,
        "Skill removed"
    );

    Ok(StatusCode::NO_CONTENT)
}
