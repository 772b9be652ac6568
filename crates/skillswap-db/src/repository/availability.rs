//! Availability repository — bookable time slots.

use chrono::{NaiveDate, Utc};
use skillswap_common::models::availability::Availability;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::row_compat::{format_datetime, get_date, get_datetime, get_opt_uuid, get_uuid};

pub(crate) struct AvailabilityRow(pub(crate) Availability);

impl<'r> sqlx::FromRow<'r, SqliteRow> for AvailabilityRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(AvailabilityRow(Availability {
            id: get_uuid(row, "id")?,
            user_id: get_uuid(row, "user_id")?,
            date: get_date(row, "date")?,
            start_time: row.try_get("start_time")?,
            end_time: row.try_get("end_time")?,
            is_booked: row.try_get("is_booked")?,
            booked_with: get_opt_uuid(row, "booked_with")?,
            created_at: get_datetime(row, "created_at")?,
        }))
    }
}

/// Publish a new slot (unbooked).
pub async fn create_slot(
    pool: &SqlitePool,
    id: Uuid,
    user_id: Uuid,
    date: NaiveDate,
    start_time: &str,
    end_time: &str,
) -> Result<Availability, sqlx::Error> {
    sqlx::query_as::<_, AvailabilityRow>(
        r#"
        INSERT INTO availability (id, user_id, date, start_time, end_time, is_booked, booked_with, created_at)
        VALUES (?, ?, ?, ?, ?, 0, NULL, ?)
        RETURNING *
        "#,
    )
    .bind(id.to_string())
    .bind(user_id.to_string())
    .bind(date.to_string())
    .bind(start_time)
    .bind(end_time)
    .bind(format_datetime(Utc::now()))
    .fetch_one(pool)
    .await
    .map(|r| r.0)
}

/// Find a slot by ID.
pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Availability>, sqlx::Error> {
    sqlx::query_as::<_, AvailabilityRow>("SELECT * FROM availability WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
        .map(|r| r.map(|a| a.0))
}

/// A user's slots in calendar order.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<Availability>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AvailabilityRow>(
        r#"
        SELECT * FROM availability
        WHERE user_id = ?
        ORDER BY date, start_time, id
        "#,
    )
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Delete a slot, refusing one that is (or just became) booked. The delete
/// only matches unbooked rows, the same compare-and-set shape booking uses,
/// so a booking racing a delete cannot strand a session on a vanished slot.
/// Returns false when no unbooked row matched.
pub async fn delete_unbooked_slot(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM availability WHERE id = ? AND is_booked = 0")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{seed_user, test_db};
    use skillswap_common::ids::generate_id;

    #[tokio::test]
    async fn slots_list_in_calendar_order() {
        let db = test_db().await;
        let host = seed_user(&db, "lena").await;
        let jan2 = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        create_slot(&db.pool, generate_id(), host.id, jan2, "09:00", "10:00")
            .await
            .unwrap();
        create_slot(&db.pool, generate_id(), host.id, jan1, "14:00", "15:00")
            .await
            .unwrap();
        create_slot(&db.pool, generate_id(), host.id, jan1, "09:00", "10:00")
            .await
            .unwrap();

        let slots = list_for_user(&db.pool, host.id).await.unwrap();
        let order: Vec<_> = slots
            .iter()
            .map(|s| (s.date, s.start_time.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(jan1, "09:00"), (jan1, "14:00"), (jan2, "09:00")]
        );
        assert!(slots.iter().all(|s| !s.is_booked && s.booked_with.is_none()));
    }

    #[tokio::test]
    async fn delete_reports_misses() {
        let db = test_db().await;
        let host = seed_user(&db, "milo").await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let slot = create_slot(&db.pool, generate_id(), host.id, date, "09:00", "09:30")
            .await
            .unwrap();

        assert!(delete_unbooked_slot(&db.pool, slot.id).await.unwrap());
        assert!(!delete_unbooked_slot(&db.pool, slot.id).await.unwrap());
        assert!(find_by_id(&db.pool, slot.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn booked_slots_cannot_be_deleted() {
        let db = test_db().await;
        let host = seed_user(&db, "nils").await;
        let guest = seed_user(&db, "otti").await;
        let date = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        let slot = create_slot(&db.pool, generate_id(), host.id, date, "10:00", "11:00")
            .await
            .unwrap();

        crate::repository::sessions::book_session(
            &db.pool,
            generate_id(),
            &slot,
            guest.id,
            generate_id(),
            false,
        )
        .await
        .unwrap()
        .expect("booking succeeds");

        assert!(!delete_unbooked_slot(&db.pool, slot.id).await.unwrap());
        let still = find_by_id(&db.pool, slot.id).await.unwrap().unwrap();
        assert!(still.is_booked);
    }
}
