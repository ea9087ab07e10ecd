/**
 * Message Database Operations
 *
 * Messages are immutable once created and are read newest-first. Ids are
 * UUIDv7 so id order tracks creation order, which the cursor relies on;
 * ordering and the cursor predicate still tie-break on `(created_at, id)`
 * so equal timestamps cannot produce duplicates or gaps between pages.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::messages::pagination::Cursored;

/// A message row joined with its sender's username.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MessageWithSender {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub sender_username: String,
}

impl Cursored for MessageWithSender {
    fn cursor_id(&self) -> Uuid {
        self.id
    }
}

/// Persist a message and return it with the sender's username attached.
pub async fn create_message(
    pool: &SqlitePool,
    chat_id: Uuid,
    sender_id: Uuid,
    text: &str,
) -> Result<MessageWithSender, sqlx::Error> {
    let id = Uuid::now_v7();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO messages (id, chat_id, sender_id, text, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(id)
    .bind(chat_id)
    .bind(sender_id)
    .bind(text)
    .bind(now)
    .execute(pool)
    .await?;

    sqlx::query_as::<_, MessageWithSender>(
        r#"
        SELECT m.id, m.chat_id, m.sender_id, m.text, m.created_at,
               u.username AS sender_username
        FROM messages m
        JOIN users u ON u.id = m.sender_id
        WHERE m.id = ?1
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}

/// Fetch up to `take` messages of a chat, newest first, strictly older
/// than the cursor message when one is given.
///
/// An unknown cursor id yields an empty page rather than an error.
pub async fn messages_page(
    pool: &SqlitePool,
    chat_id: Uuid,
    cursor: Option<Uuid>,
    take: i64,
) -> Result<Vec<MessageWithSender>, sqlx::Error> {
    match cursor {
        Some(cursor) => {
            sqlx::query_as::<_, MessageWithSender>(
                r#"
                SELECT m.id, m.chat_id, m.sender_id, m.text, m.created_at,
                       u.username AS sender_username
                FROM messages m
                JOIN users u ON u.id = m.sender_id
                WHERE m.chat_id = ?1
                  AND (m.created_at, m.id) <
                      (SELECT created_at, id FROM messages WHERE id = ?2)
                ORDER BY m.created_at DESC, m.id DESC
                LIMIT ?3
                "#,
            )
            .bind(chat_id)
            .bind(cursor)
            .bind(take)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, MessageWithSender>(
                r#"
                SELECT m.id, m.chat_id, m.sender_id, m.text, m.created_at,
                       u.username AS sender_username
                FROM messages m
                JOIN users u ON u.id = m.sender_id
                WHERE m.chat_id = ?1
                ORDER BY m.created_at DESC, m.id DESC
                LIMIT ?2
                "#,
            )
            .bind(chat_id)
            .bind(take)
            .fetch_all(pool)
            .await
        }
    }
}

/// Count a chat's messages. Used by tests to assert that rejected sends
/// leave no rows behind.
pub async fn count_messages(pool: &SqlitePool, chat_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM messages WHERE chat_id = ?1")
            .bind(chat_id)
            .fetch_one(pool)
            .await?;

    Ok(count)
}
