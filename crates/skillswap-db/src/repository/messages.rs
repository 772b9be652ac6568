//! Message repository — append-only sends plus the read-flag transition.

use chrono::Utc;
use skillswap_common::models::message::{Message, MessageKind};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use uuid::Uuid;

use super::conversations;
use crate::row_compat::{format_datetime, get_datetime, get_enum, get_uuid};

struct MessageRow(Message);

impl<'r> sqlx::FromRow<'r, SqliteRow> for MessageRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        use sqlx::Row;
        Ok(MessageRow(Message {
            id: get_uuid(row, "id")?,
            conversation_id: get_uuid(row, "conversation_id")?,
            sender_id: get_uuid(row, "sender_id")?,
            receiver_id: get_uuid(row, "receiver_id")?,
            content: row.try_get("content")?,
            kind: get_enum(row, "kind", MessageKind::parse)?,
            is_read: row.try_get("is_read")?,
            created_at: get_datetime(row, "created_at")?,
        }))
    }
}

/// Append a message to an existing conversation.
pub async fn create_message(
    pool: &SqlitePool,
    id: Uuid,
    conversation_id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: &str,
    kind: MessageKind,
) -> Result<Message, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>(
        r#"
        INSERT INTO messages (id, conversation_id, sender_id, receiver_id, content, kind, is_read, created_at)
        VALUES (?, ?, ?, ?, ?, ?, 0, ?)
        RETURNING *
        "#,
    )
    .bind(id.to_string())
    .bind(conversation_id.to_string())
    .bind(sender_id.to_string())
    .bind(receiver_id.to_string())
    .bind(content)
    .bind(kind.as_str())
    .bind(format_datetime(Utc::now()))
    .fetch_one(pool)
    .await
    .map(|r| r.0)
}

/// Send a message: find-or-create the pair's conversation (using
/// `conversation_id` for a new one), append the message, and point the
/// conversation at it.
#[allow(clippy::too_many_arguments)]
pub async fn send_message(
    pool: &SqlitePool,
    message_id: Uuid,
    conversation_id: Uuid,
    sender_id: Uuid,
    receiver_id: Uuid,
    content: &str,
    kind: MessageKind,
) -> Result<Message, sqlx::Error> {
    let conversation = conversations::find_or_create(pool, conversation_id, sender_id, receiver_id).await?;
    let message =
        create_message(pool, message_id, conversation.id, sender_id, receiver_id, content, kind)
            .await?;
    conversations::touch_last_message(pool, conversation.id, message.id, message.created_at)
        .await?;
    Ok(message)
}

/// Find a message by ID.
pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Message>, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>("SELECT * FROM messages WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
        .map(|r| r.map(|m| m.0))
}

/// All messages in a conversation, oldest first (stable on id for ties).
pub async fn list_for_conversation(
    pool: &SqlitePool,
    conversation_id: Uuid,
) -> Result<Vec<Message>, sqlx::Error> {
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT * FROM messages
        WHERE conversation_id = ?
        ORDER BY created_at ASC, id ASC
        "#,
    )
    .bind(conversation_id.to_string())
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(|r| r.0).collect())
}

/// Flip the read flag. Idempotent: marking an already-read message is a
/// successful no-op.
pub async fn mark_read(pool: &SqlitePool, id: Uuid) -> Result<Message, sqlx::Error> {
    sqlx::query_as::<_, MessageRow>("UPDATE messages SET is_read = 1 WHERE id = ? RETURNING *")
        .bind(id.to_string())
        .fetch_one(pool)
        .await
        .map(|r| r.0)
}
