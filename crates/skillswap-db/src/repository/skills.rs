//! Skill repository — the global catalog plus per-user teach/learn membership.
//!
//! Catalog rows and list membership are managed together: deleting a skill a
//! user owns removes the catalog entry, while their attachments are cleared
//! regardless of who owns the catalog row.

use chrono::Utc;
use skillswap_common::models::skill::{Skill, SkillCategory, SkillKind, SkillLevel};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::row_compat::{format_datetime, get_datetime, get_enum, get_uuid};

struct SkillRow(Skill);

impl<'r> sqlx::FromRow<'r, SqliteRow> for SkillRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(SkillRow(Skill {
            id: get_uuid(row, "id")?,
            owner_id: get_uuid(row, "owner_id")?,
            name: row.try_get("name")?,
            category: get_enum(row, "category", SkillCategory::parse)?,
            description: row.try_get("description")?,
            level: get_enum(row, "level", SkillLevel::parse)?,
            image: row.try_get("image")?,
            created_at: get_datetime(row, "created_at")?,
        }))
    }
}

/// Insert a new catalog skill.
pub async fn create_skill(
    pool: &SqlitePool,
    id: Uuid,
    owner_id: Uuid,
    name: &str,
    category: SkillCategory,
    description: &str,
    level: SkillLevel,
    image: &str,
) -> Result<Skill, sqlx::Error> {
    sqlx::query_as::<_, SkillRow>(
        r#"
        INSERT INTO skills (id, owner_id, name, category, description, level, image, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(id.to_string())
    .bind(owner_id.to_string())
    .bind(name)
    .bind(category.as_str())
    .bind(description)
    .bind(level.as_str())
    .bind(image)
    .bind(format_datetime(Utc::now()))
    .fetch_one(pool)
    .await
    .map(|r| r.0)
}

/// Find a catalog skill by ID.
pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Skill>, sqlx::Error> {
    sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
        .map(|r| r.map(|s| s.0))
}

/// Browse the catalog, optionally filtered by a name/description substring
/// and/or category.
pub async fn list_skills(
    pool: &SqlitePool,
    q: Option<&str>,
    category: Option<SkillCategory>,
) -> Result<Vec<Skill>, sqlx::Error> {
    let pattern = q.map(|q| format!("%{q}%"));
    let rows = sqlx::query_as::<_, SkillRow>(
        r#"
        SELECT * FROM skills
        WHERE (? IS NULL OR name LIKE ? OR description LIKE ?)
          AND (? IS NULL OR category = ?)
        ORDER BY created_at, id
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(category.map(|c| c.as_str()))
    .bind(category.map(|c| c.as_str()))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Attach a catalog skill to a user's teach or learn list.
///
/// Returns false when the (user, skill, kind) triple is already attached.
pub async fn attach_to_user(
    pool: &SqlitePool,
    user_id: Uuid,
    skill_id: Uuid,
    kind: SkillKind,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO user_skills (user_id, skill_id, kind, added_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (user_id, skill_id, kind) DO NOTHING
        "#,
    )
    .bind(user_id.to_string())
    .bind(skill_id.to_string())
    .bind(kind.as_str())
    .bind(format_datetime(Utc::now()))
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Remove a skill from a user's teach *and* learn lists. Returns the number
/// of attachments removed.
pub async fn detach_from_user(
    pool: &SqlitePool,
    user_id: Uuid,
    skill_id: Uuid,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM user_skills WHERE user_id = ? AND skill_id = ?")
        .bind(user_id.to_string())
        .bind(skill_id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Delete the catalog entry only when `owner_id` owns it. Other users'
/// attachments to the deleted entry are removed by the schema.
pub async fn delete_catalog_entry(
    pool: &SqlitePool,
    skill_id: Uuid,
    owner_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM skills WHERE id = ? AND owner_id = ?")
        .bind(skill_id.to_string())
        .bind(owner_id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// A user's teach or learn list, in insertion order.
pub async fn list_user_skills(
    pool: &SqlitePool,
    user_id: Uuid,
    kind: SkillKind,
) -> Result<Vec<Skill>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SkillRow>(
        r#"
        SELECT s.* FROM skills s
        INNER JOIN user_skills us ON us.skill_id = s.id
        WHERE us.user_id = ? AND us.kind = ?
        ORDER BY us.added_at, s.id
        "#,
    )
    .bind(user_id.to_string())
    .bind(kind.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{seed_user, test_db};
    use skillswap_common::ids::generate_id;

    async fn seed_skill(
        pool: &SqlitePool,
        owner: Uuid,
        name: &str,
        category: SkillCategory,
    ) -> Skill {
        create_skill(
            pool,
            generate_id(),
            owner,
            name,
            category,
            "",
            SkillLevel::Intermediate,
            "https://example.com/cover.jpg",
        )
        .await
        .expect("seed skill")
    }

    #[tokio::test]
    async fn attach_is_unique_per_kind() {
        let db = test_db().await;
        let user = seed_user(&db, "alex").await;
        let skill = seed_skill(&db.pool, user.id, "Chess", SkillCategory::Other).await;

        assert!(
            attach_to_user(&db.pool, user.id, skill.id, SkillKind::Teach)
                .await
                .unwrap()
        );
        // Same triple again: rejected
        assert!(
            !attach_to_user(&db.pool, user.id, skill.id, SkillKind::Teach)
                .await
                .unwrap()
        );
        // Same skill on the other list is fine
        assert!(
            attach_to_user(&db.pool, user.id, skill.id, SkillKind::Learn)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn delete_removes_catalog_only_for_owner() {
        let db = test_db().await;
        let owner = seed_user(&db, "bella").await;
        let other = seed_user(&db, "carl").await;
        let skill = seed_skill(&db.pool, owner.id, "Sourdough", SkillCategory::Cooking).await;
        attach_to_user(&db.pool, owner.id, skill.id, SkillKind::Teach)
            .await
            .unwrap();
        attach_to_user(&db.pool, other.id, skill.id, SkillKind::Learn)
            .await
            .unwrap();

        // `other` doesn't own the catalog entry: their attachment goes, the
        // catalog row stays.
        assert!(!delete_catalog_entry(&db.pool, skill.id, other.id).await.unwrap());
        assert_eq!(detach_from_user(&db.pool, other.id, skill.id).await.unwrap(), 1);
        assert!(find_by_id(&db.pool, skill.id).await.unwrap().is_some());

        // The owner's delete removes the catalog row too.
        assert!(delete_catalog_entry(&db.pool, skill.id, owner.id).await.unwrap());
        assert!(find_by_id(&db.pool, skill.id).await.unwrap().is_none());
        // And the owner's own attachment went with it (schema cascade).
        let left = list_user_skills(&db.pool, owner.id, SkillKind::Teach)
            .await
            .unwrap();
        assert!(left.is_empty());
    }

    #[tokio::test]
    async fn user_lists_keep_insertion_order() {
        let db = test_db().await;
        let user = seed_user(&db, "devi").await;
        let first = seed_skill(&db.pool, user.id, "Hindi", SkillCategory::Language).await;
        let second = seed_skill(&db.pool, user.id, "Tabla", SkillCategory::Music).await;
        attach_to_user(&db.pool, user.id, first.id, SkillKind::Teach)
            .await
            .unwrap();
        attach_to_user(&db.pool, user.id, second.id, SkillKind::Teach)
            .await
            .unwrap();

        let list = list_user_skills(&db.pool, user.id, SkillKind::Teach)
            .await
            .unwrap();
        assert_eq!(
            list.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }

    #[tokio::test]
    async fn catalog_browse_filters() {
        let db = test_db().await;
        let user = seed_user(&db, "emil").await;
        seed_skill(&db.pool, user.id, "Rust", SkillCategory::Technology).await;
        seed_skill(&db.pool, user.id, "Watercolor", SkillCategory::Art).await;

        let all = list_skills(&db.pool, None, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let tech = list_skills(&db.pool, None, Some(SkillCategory::Technology))
            .await
            .unwrap();
        assert_eq!(tech.len(), 1);
        assert_eq!(tech[0].name, "Rust");

        let by_name = list_skills(&db.pool, Some("water"), None).await.unwrap();
        assert_eq!(by_name.len(), 1);

        let neither = list_skills(&db.pool, Some("water"), Some(SkillCategory::Technology))
            .await
            .unwrap();
        assert!(neither.is_empty());
    }
}
