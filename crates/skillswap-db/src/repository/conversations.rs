//! Conversation repository — one thread per unordered participant pair.
//!
//! Conversations are created lazily by the first message between a pair and
//! only ever updated afterwards; the canonicalized (user_low, user_high)
//! columns carry the uniqueness invariant.

use chrono::{DateTime, Utc};
use skillswap_common::models::conversation::{Conversation, canonical_pair};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use crate::row_compat::{format_datetime, get_datetime, get_opt_uuid, get_uuid};

struct ConversationRow(Conversation);

impl<'r> sqlx::FromRow<'r, SqliteRow> for ConversationRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(ConversationRow(Conversation {
            id: get_uuid(row, "id")?,
            user_low: get_uuid(row, "user_low")?,
            user_high: get_uuid(row, "user_high")?,
            last_message_id: get_opt_uuid(row, "last_message_id")?,
            updated_at: get_datetime(row, "updated_at")?,
        }))
    }
}

/// Find a conversation by ID.
pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Conversation>, sqlx::Error> {
    sqlx::query_as::<_, ConversationRow>("SELECT * FROM conversations WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
        .map(|r| r.map(|c| c.0))
}

/// Find the conversation for an unordered pair of users.
pub async fn find_by_pair(
    pool: &SqlitePool,
    a: Uuid,
    b: Uuid,
) -> Result<Option<Conversation>, sqlx::Error> {
    let (low, high) = canonical_pair(a, b);
    sqlx::query_as::<_, ConversationRow>(
        "SELECT * FROM conversations WHERE user_low = ? AND user_high = ?",
    )
    .bind(low.to_string())
    .bind(high.to_string())
    .fetch_optional(pool)
    .await
    .map(|r| r.map(|c| c.0))
}

/// Get the pair's conversation, creating it (with `id`) on first contact.
///
/// The insert ignores a unique-pair conflict instead of erroring, so two
/// first-contact sends racing each other both land in the same conversation:
/// the loser's insert returns no row and falls through to the lookup.
pub async fn find_or_create(
    pool: &SqlitePool,
    id: Uuid,
    a: Uuid,
    b: Uuid,
) -> Result<Conversation, sqlx::Error> {
    if let Some(existing) = find_by_pair(pool, a, b).await? {
        return Ok(existing);
    }

    let (low, high) = canonical_pair(a, b);
    let inserted = sqlx::query_as::<_, ConversationRow>(
        r#"
        INSERT INTO conversations (id, user_low, user_high, last_message_id, updated_at)
        VALUES (?, ?, ?, NULL, ?)
        ON CONFLICT (user_low, user_high) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(id.to_string())
    .bind(low.to_string())
    .bind(high.to_string())
    .bind(format_datetime(Utc::now()))
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(row) => Ok(row.0),
        // Lost the insert race: the winner's row is there now.
        None => find_by_pair(pool, a, b)
            .await?
            .ok_or(sqlx::Error::RowNotFound),
    }
}

/// Point the conversation at its newest message.
pub async fn touch_last_message(
    pool: &SqlitePool,
    conversation_id: Uuid,
    message_id: Uuid,
    at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE conversations SET last_message_id = ?, updated_at = ? WHERE id = ?")
        .bind(message_id.to_string())
        .bind(format_datetime(at))
        .bind(conversation_id.to_string())
        .execute(pool)
        .await?;
    Ok(())
}

/// All conversations a user participates in, most recently active first.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<Conversation>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ConversationRow>(
        r#"
        SELECT * FROM conversations
        WHERE user_low = ? OR user_high = ?
        ORDER BY updated_at DESC, id
        "#,
    )
    .bind(user_id.to_string())
    .bind(user_id.to_string())
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// How many messages in this conversation the user has not read yet.
pub async fn unread_count(
    pool: &SqlitePool,
    conversation_id: Uuid,
    user_id: Uuid,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*) FROM messages
        WHERE conversation_id = ? AND receiver_id = ? AND is_read = 0
        "#,
    )
    .bind(conversation_id.to_string())
    .bind(user_id.to_string())
    .fetch_one(pool)
    .await
}
