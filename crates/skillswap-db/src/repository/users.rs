//! User repository — CRUD operations for user accounts.

use chrono::Utc;
use skillswap_common::models::user::User;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::row_compat::{format_datetime, get_datetime, get_uuid};

struct UserRow(User);

impl<'r> sqlx::FromRow<'r, SqliteRow> for UserRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(UserRow(User {
            id: get_uuid(row, "id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            bio: row.try_get("bio")?,
            location: row.try_get("location")?,
            avatar: row.try_get("avatar")?,
            joined_at: get_datetime(row, "joined_at")?,
            updated_at: get_datetime(row, "updated_at")?,
        }))
    }
}

/// Create a new user account with empty teach/learn lists.
#[allow(clippy::too_many_arguments)]
pub async fn create_user(
    pool: &SqlitePool,
    id: Uuid,
    name: &str,
    email: &str,
    password_hash: &str,
    bio: &str,
    location: &str,
    avatar: Option<&str>,
) -> Result<User, sqlx::Error> {
    let now = format_datetime(Utc::now());
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, name, email, password_hash, bio, location, avatar, joined_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(id.to_string())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(bio)
    .bind(location)
    .bind(avatar)
    .bind(&now)
    .bind(&now)
    .fetch_one(pool)
    .await
    .map(|r| r.0)
}

/// Find a user by their unique ID.
pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
        .map(|r| r.map(|u| u.0))
}

/// Find a user by email (case-insensitive).
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ? COLLATE NOCASE")
        .bind(email)
        .fetch_optional(pool)
        .await
        .map(|r| r.map(|u| u.0))
}

/// List the roster, optionally filtered by a name/location substring.
pub async fn list_users(pool: &SqlitePool, q: Option<&str>) -> Result<Vec<User>, sqlx::Error> {
    let rows = if let Some(q) = q {
        let pattern = format!("%{q}%");
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT * FROM users
            WHERE name LIKE ? OR location LIKE ?
            ORDER BY joined_at, id
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY joined_at, id")
            .fetch_all(pool)
            .await?
    };
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Update profile fields; absent fields keep their current value.
pub async fn update_user(
    pool: &SqlitePool,
    id: Uuid,
    name: Option<&str>,
    bio: Option<&str>,
    location: Option<&str>,
    avatar: Option<&str>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users SET
            name = COALESCE(?, name),
            bio = COALESCE(?, bio),
            location = COALESCE(?, location),
            avatar = COALESCE(?, avatar),
            updated_at = ?
        WHERE id = ?
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(bio)
    .bind(location)
    .bind(avatar)
    .bind(format_datetime(Utc::now()))
    .bind(id.to_string())
    .fetch_one(pool)
    .await
    .map(|r| r.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{seed_user, test_db};
    use skillswap_common::ids::generate_id;

    #[tokio::test]
    async fn register_then_lookup() {
        let db = test_db().await;
        let id = generate_id();
        let user = create_user(
            &db.pool,
            id,
            "Priya",
            "priya@example.com",
            "hash",
            "I teach chess",
            "Mumbai",
            None,
        )
        .await
        .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.name, "Priya");

        let found = find_by_id(&db.pool, id).await.unwrap().unwrap();
        assert_eq!(found.email, "priya@example.com");
        assert!(find_by_id(&db.pool, generate_id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_lookup_is_case_insensitive() {
        let db = test_db().await;
        seed_user(&db, "casey").await;
        let found = find_by_email(&db.pool, "CASEY@example.com").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_by_schema() {
        let db = test_db().await;
        seed_user(&db, "dana").await;
        let res = create_user(
            &db.pool,
            generate_id(),
            "Other Dana",
            "dana@example.com",
            "hash",
            "",
            "",
            None,
        )
        .await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn partial_update_preserves_other_fields() {
        let db = test_db().await;
        let user = seed_user(&db, "erin").await;

        let updated = update_user(&db.pool, user.id, None, Some("new bio"), None, None)
            .await
            .unwrap();
        assert_eq!(updated.bio, "new bio");
        assert_eq!(updated.name, user.name);
        assert_eq!(updated.location, user.location);
    }

    #[tokio::test]
    async fn list_filters_by_name_or_location() {
        let db = test_db().await;
        seed_user(&db, "frank").await;
        let mut g = seed_user(&db, "grace").await;
        g = update_user(&db.pool, g.id, None, None, Some("Frankfurt"), None)
            .await
            .unwrap();

        let all = list_users(&db.pool, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let hits = list_users(&db.pool, Some("frank")).await.unwrap();
        // "frank" the name and "Frankfurt" the location both match
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().any(|u| u.id == g.id));

        let none = list_users(&db.pool, Some("zurich")).await.unwrap();
        assert!(none.is_empty());
    }
}
