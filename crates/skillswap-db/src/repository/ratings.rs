//! Rating repository — append-only feedback with a last-write-wins pointer
//! on the session.

use chrono::Utc;
use skillswap_common::models::rating::Rating;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::row_compat::{format_datetime, get_datetime, get_uuid};

struct RatingRow(Rating);

impl<'r> sqlx::FromRow<'r, SqliteRow> for RatingRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(RatingRow(Rating {
            id: get_uuid(row, "id")?,
            session_id: get_uuid(row, "session_id")?,
            from_user_id: get_uuid(row, "from_user_id")?,
            to_user_id: get_uuid(row, "to_user_id")?,
            score: row.try_get("score")?,
            comment: row.try_get("comment")?,
            created_at: get_datetime(row, "created_at")?,
        }))
    }
}

/// Append a rating and point the session at it. Every submission lands in the
/// ratings table; only the session's `rating_id` is overwritten.
#[allow(clippy::too_many_arguments)]
pub async fn add_rating(
    pool: &SqlitePool,
    id: Uuid,
    session_id: Uuid,
    from_user_id: Uuid,
    to_user_id: Uuid,
    score: i32,
    comment: &str,
) -> Result<Rating, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let rating = sqlx::query_as::<_, RatingRow>(
        r#"
        INSERT INTO ratings (id, session_id, from_user_id, to_user_id, score, comment, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(id.to_string())
    .bind(session_id.to_string())
    .bind(from_user_id.to_string())
    .bind(to_user_id.to_string())
    .bind(score)
    .bind(comment)
    .bind(format_datetime(Utc::now()))
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE sessions SET rating_id = ? WHERE id = ?")
        .bind(id.to_string())
        .bind(session_id.to_string())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(rating.0)
}

/// Ratings received by a user, newest first.
pub async fn list_received(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Rating>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RatingRow>(
        "SELECT * FROM ratings WHERE to_user_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Arithmetic mean of a user's received scores. Exactly 0 with no ratings —
/// a defined zero case, never null.
pub async fn average_received(pool: &SqlitePool, user_id: Uuid) -> Result<f64, sqlx::Error> {
    sqlx::query_scalar::<_, f64>(
        "SELECT COALESCE(AVG(score), 0.0) FROM ratings WHERE to_user_id = ?",
    )
    .bind(user_id.to_string())
    .fetch_one(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{availability, sessions};
    use crate::test_util::{seed_user, test_db};
    use chrono::NaiveDate;
    use skillswap_common::ids::generate_id;
    use skillswap_common::models::session::Session;

    async fn seed_session(db: &crate::Database, host: Uuid, guest: Uuid) -> Session {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let slot = availability::create_slot(&db.pool, generate_id(), host, date, "09:00", "10:00")
            .await
            .unwrap();
        sessions::book_session(&db.pool, generate_id(), &slot, guest, generate_id(), false)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn average_is_zero_with_no_ratings() {
        let db = test_db().await;
        let user = seed_user(&db, "xena").await;
        assert_eq!(average_received(&db.pool, user.id).await.unwrap(), 0.0);
        assert!(list_received(&db.pool, user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resubmission_appends_but_session_pointer_moves() {
        let db = test_db().await;
        let host = seed_user(&db, "yuri").await;
        let guest = seed_user(&db, "zoe").await;
        let session = seed_session(&db, host.id, guest.id).await;

        let first = add_rating(&db.pool, generate_id(), session.id, guest.id, host.id, 4, "great")
            .await
            .unwrap();
        let second = add_rating(&db.pool, generate_id(), session.id, guest.id, host.id, 2, "meh")
            .await
            .unwrap();

        // Both entries count toward the mean
        let received = list_received(&db.pool, host.id).await.unwrap();
        assert_eq!(received.len(), 2);
        assert_eq!(average_received(&db.pool, host.id).await.unwrap(), 3.0);

        // The session keeps only the most recent pointer
        let updated = sessions::find_by_id(&db.pool, session.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.rating_id, Some(second.id));
        assert_ne!(updated.rating_id, Some(first.id));
    }

    #[tokio::test]
    async fn average_only_counts_the_ratee() {
        let db = test_db().await;
        let host = seed_user(&db, "ada").await;
        let guest = seed_user(&db, "bram").await;
        let session = seed_session(&db, host.id, guest.id).await;

        add_rating(&db.pool, generate_id(), session.id, guest.id, host.id, 5, "")
            .await
            .unwrap();
        add_rating(&db.pool, generate_id(), session.id, host.id, guest.id, 3, "")
            .await
            .unwrap();

        assert_eq!(average_received(&db.pool, host.id).await.unwrap(), 5.0);
        assert_eq!(average_received(&db.pool, guest.id).await.unwrap(), 3.0);
    }
}
