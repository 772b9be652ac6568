//! Session repository — booking and the one-way status machine.
//!
//! Booking claims the slot and creates the session in one transaction; the
//! slot claim is a compare-and-set on `is_booked = 0`, so two guests racing
//! for the same slot cannot both win.

use chrono::Utc;
use skillswap_common::models::availability::Availability;
use skillswap_common::models::session::{Session, SessionStatus};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::row_compat::{format_datetime, get_date, get_datetime, get_enum, get_opt_uuid, get_uuid};

struct SessionRow(Session);

impl<'r> sqlx::FromRow<'r, SqliteRow> for SessionRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(SessionRow(Session {
            id: get_uuid(row, "id")?,
            availability_id: get_uuid(row, "availability_id")?,
            host_id: get_uuid(row, "host_id")?,
            guest_id: get_uuid(row, "guest_id")?,
            skill_id: get_uuid(row, "skill_id")?,
            date: get_date(row, "date")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            is_video_call: row.try_get("is_video_call")?,
            status: get_enum(row, "status", SessionStatus::parse)?,
            rating_id: get_opt_uuid(row, "rating_id")?,
            created_at: get_datetime(row, "created_at")?,
        }))
    }
}

/// Book `slot` for `guest_id`: flip exactly that slot to booked and create
/// the scheduled session, atomically.
///
/// Returns `None` when the slot was already booked (the compare-and-set
/// claimed zero rows); no session is created in that case.
pub async fn book_session(
    pool: &SqlitePool,
    id: Uuid,
    slot: &Availability,
    guest_id: Uuid,
    skill_id: Uuid,
    is_video_call: bool,
) -> Result<Option<Session>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let claimed = sqlx::query(
        "UPDATE availability SET is_booked = 1, booked_with = ? WHERE id = ? AND is_booked = 0",
    )
    .bind(guest_id.to_string())
    .bind(slot.id.to_string())
    .execute(&mut *tx)
    .await?;

    if claimed.rows_affected() == 0 {
        return Ok(None);
    }

    let session = sqlx::query_as::<_, SessionRow>(
        r#"
        INSERT INTO sessions (
            id, availability_id, host_id, guest_id, skill_id,
            date, start_time, end_time, is_video_call, status, rating_id, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'scheduled', NULL, ?)
        RETURNING *
        "#,
    )
    .bind(id.to_string())
    .bind(slot.id.to_string())
    .bind(slot.user_id.to_string())
    .bind(guest_id.to_string())
    .bind(skill_id.to_string())
    .bind(slot.date.to_string())
    .bind(&slot.start_time)
    .bind(&slot.end_time)
    .bind(is_video_call)
    .bind(format_datetime(Utc::now()))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Some(session.0))
}

/// Find a session by ID.
pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
        .map(|r| r.map(|s| s.0))
}

/// Sessions where the user is host or guest, optionally filtered by status.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
    status: Option<SessionStatus>,
) -> Result<Vec<Session>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SessionRow>(
        r#"
        SELECT * FROM sessions
        WHERE (host_id = ? OR guest_id = ?)
          AND (? IS NULL OR status = ?)
        ORDER BY date, start_time, id
        "#,
    )
    .bind(user_id.to_string())
    .bind(user_id.to_string())
    .bind(status.map(|s| s.as_str()))
    .bind(status.map(|s| s.as_str()))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Move a scheduled session to a terminal status. The transition is one-way:
/// the update only matches rows still in `scheduled`, so completing or
/// cancelling twice (or un-cancelling) claims nothing and returns `None`.
pub async fn update_status(
    pool: &SqlitePool,
    id: Uuid,
    status: SessionStatus,
) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>(
        "UPDATE sessions SET status = ? WHERE id = ? AND status = 'scheduled' RETURNING *",
    )
    .bind(status.as_str())
    .bind(id.to_string())
    .fetch_optional(pool)
    .await
    .map(|r| r.map(|s| s.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::availability;
    use crate::test_util::{seed_user, test_db};
    use chrono::NaiveDate;
    use skillswap_common::ids::generate_id;

    async fn seed_slot(db: &crate::Database, host: Uuid) -> Availability {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        availability::create_slot(&db.pool, generate_id(), host, date, "09:00", "10:00")
            .await
            .expect("seed slot")
    }

    #[tokio::test]
    async fn booking_flips_exactly_the_target_slot() {
        let db = test_db().await;
        let host = seed_user(&db, "nora").await;
        let guest = seed_user(&db, "omar").await;
        let slot = seed_slot(&db, host.id).await;
        let other = seed_slot(&db, host.id).await;

        let session = book_session(&db.pool, generate_id(), &slot, guest.id, generate_id(), true)
            .await
            .unwrap()
            .expect("first booking succeeds");

        assert_eq!(session.status, SessionStatus::Scheduled);
        assert_eq!(session.host_id, host.id);
        assert_eq!(session.guest_id, guest.id);
        assert_eq!(session.date, slot.date);
        assert_eq!(session.start_time, slot.start_time);

        let booked = availability::find_by_id(&db.pool, slot.id)
            .await
            .unwrap()
            .unwrap();
        assert!(booked.is_booked);
        assert_eq!(booked.booked_with, Some(guest.id));

        let untouched = availability::find_by_id(&db.pool, other.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!untouched.is_booked);
        assert!(untouched.booked_with.is_none());
    }

    #[tokio::test]
    async fn double_booking_is_rejected_and_creates_no_session() {
        let db = test_db().await;
        let host = seed_user(&db, "pia").await;
        let first = seed_user(&db, "quinn").await;
        let second = seed_user(&db, "remy").await;
        let slot = seed_slot(&db, host.id).await;

        book_session(&db.pool, generate_id(), &slot, first.id, generate_id(), false)
            .await
            .unwrap()
            .expect("first booking succeeds");

        let lost = book_session(&db.pool, generate_id(), &slot, second.id, generate_id(), false)
            .await
            .unwrap();
        assert!(lost.is_none());

        // The loser left no session behind
        assert!(list_for_user(&db.pool, second.id, None).await.unwrap().is_empty());
        // And the slot still belongs to the first guest
        let booked = availability::find_by_id(&db.pool, slot.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(booked.booked_with, Some(first.id));
    }

    #[tokio::test]
    async fn sessions_listed_for_host_and_guest() {
        let db = test_db().await;
        let host = seed_user(&db, "sana").await;
        let guest = seed_user(&db, "theo").await;
        let outsider = seed_user(&db, "uma").await;
        let slot = seed_slot(&db, host.id).await;

        let session = book_session(&db.pool, generate_id(), &slot, guest.id, generate_id(), true)
            .await
            .unwrap()
            .unwrap();

        for user in [host.id, guest.id] {
            let listed = list_for_user(&db.pool, user, None).await.unwrap();
            assert_eq!(listed.len(), 1);
            assert_eq!(listed[0].id, session.id);
        }
        assert!(list_for_user(&db.pool, outsider.id, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_transitions_are_one_way() {
        let db = test_db().await;
        let host = seed_user(&db, "vera").await;
        let guest = seed_user(&db, "wes").await;
        let slot = seed_slot(&db, host.id).await;
        let session = book_session(&db.pool, generate_id(), &slot, guest.id, generate_id(), false)
            .await
            .unwrap()
            .unwrap();

        let completed = update_status(&db.pool, session.id, SessionStatus::Completed)
            .await
            .unwrap()
            .expect("scheduled -> completed");
        assert_eq!(completed.status, SessionStatus::Completed);

        // Terminal: no further transitions claim the row
        assert!(
            update_status(&db.pool, session.id, SessionStatus::Cancelled)
                .await
                .unwrap()
                .is_none()
        );
        let still = find_by_id(&db.pool, session.id).await.unwrap().unwrap();
        assert_eq!(still.status, SessionStatus::Completed);

        // Status filter sees the terminal state
        let past = list_for_user(&db.pool, host.id, Some(SessionStatus::Completed))
            .await
            .unwrap();
        assert_eq!(past.len(), 1);
        assert!(
            list_for_user(&db.pool, host.id, Some(SessionStatus::Scheduled))
                .await
                .unwrap()
                .is_empty()
        );
    }
}
