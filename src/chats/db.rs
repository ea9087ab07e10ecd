/**
 * Chat Database Operations
 */

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use uuid::Uuid;

/// A chat row. `name` is always NULL for non-group chats.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: Uuid,
    pub name: Option<String>,
    pub is_group: bool,
    pub created_at: DateTime<Utc>,
}

/// One membership row per (user, chat) pair.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatMember {
    pub user_id: Uuid,
    pub chat_id: Uuid,
    pub role: String,
}

/// A chat as returned by the list endpoint: the row plus member count and
/// the most recent message, if any.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub is_group: bool,
    pub created_at: DateTime<Utc>,
    pub member_count: i64,
    #[sqlx(skip)]
    pub last_message: Option<LastMessage>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Create a chat and exactly one membership row for its creator: ADMIN for
/// a group chat, MEMBER for a private one. A non-group chat's name is
/// forced to NULL regardless of input.
pub async fn create_chat(
    pool: &SqlitePool,
    creator_id: Uuid,
    name: Option<String>,
    is_group: bool,
) -> Result<(Chat, ChatMember), sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let name = if is_group { name } else { None };
    let role = if is_group { "ADMIN" } else { "MEMBER" };

    let mut tx = pool.begin().await?;

    let chat = sqlx::query_as::<_, Chat>(
        r#"
        INSERT INTO chats (id, name, is_group, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, name, is_group, created_at
        "#,
    )
    .bind(id)
    .bind(&name)
    .bind(is_group)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let member = sqlx::query_as::<_, ChatMember>(
        r#"
        INSERT INTO chat_members (user_id, chat_id, role)
        VALUES (?1, ?2, ?3)
        RETURNING user_id, chat_id, role
        "#,
    )
    .bind(creator_id)
    .bind(chat.id)
    .bind(role)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok((chat, member))
}

/// Add a user to a chat as a plain member.
pub async fn add_chat_member(
    pool: &SqlitePool,
    chat_id: Uuid,
    user_id: Uuid,
) -> Result<ChatMember, sqlx::Error> {
    sqlx::query_as::<_, ChatMember>(
        r#"
        INSERT INTO chat_members (user_id, chat_id, role)
        VALUES (?1, ?2, 'MEMBER')
        RETURNING user_id, chat_id, role
        "#,
    )
    .bind(user_id)
    .bind(chat_id)
    .fetch_one(pool)
    .await
}

/// All chats a user belongs to, newest first, each with its member count
/// and latest message.
pub async fn chats_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<ChatSummary>, sqlx::Error> {
    let mut chats = sqlx::query_as::<_, ChatSummary>(
        r#"
        SELECT c.id, c.name, c.is_group, c.created_at,
               (SELECT COUNT(*) FROM chat_members m WHERE m.chat_id = c.id) AS member_count
        FROM chats c
        JOIN chat_members me ON me.chat_id = c.id
        WHERE me.user_id = ?1
        ORDER BY c.created_at DESC, c.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    for chat in &mut chats {
        chat.last_message = sqlx::query_as::<_, LastMessage>(
            r#"
            SELECT id, sender_id, text, created_at
            FROM messages
            WHERE chat_id = ?1
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(chat.id)
        .fetch_optional(pool)
        .await?;
    }

    Ok(chats)
}

/// Just the chat ids a user belongs to; the realtime handshake builds its
/// subscription set from this.
pub async fn chat_ids_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows: Vec<(Uuid,)> =
        sqlx::query_as("SELECT chat_id FROM chat_members WHERE user_id = ?1")
            .bind(user_id)
            .fetch_all(pool)
            .await?;

    Ok(rows.into_iter().map(|(id,)| id).collect())
}

/// Whether a user is currently a member of a chat.
pub async fn is_chat_member(
    pool: &SqlitePool,
    chat_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT 1 FROM chat_members WHERE chat_id = ?1 AND user_id = ?2",
    )
    .bind(chat_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::create_user;
    use crate::messages::db::create_message;
    use crate::server::config::test_pool;

    #[tokio::test]
    async fn test_private_chat_has_null_name_and_member_role() {
        let pool = test_pool().await;
        let user = create_user(&pool, "alice", "hash").await.unwrap();

        let (chat, member) =
            create_chat(&pool, user.id, Some("ignored".into()), false).await.unwrap();

        assert!(chat.name.is_none());
        assert!(!chat.is_group);
        assert_eq!(member.role, "MEMBER");
        assert_eq!(member.user_id, user.id);
        assert_eq!(member.chat_id, chat.id);
    }

    #[tokio::test]
    async fn test_group_chat_creator_is_admin() {
        let pool = test_pool().await;
        let user = create_user(&pool, "alice", "hash").await.unwrap();

        let (chat, member) =
            create_chat(&pool, user.id, Some("rustaceans".into()), true).await.unwrap();

        assert_eq!(chat.name.as_deref(), Some("rustaceans"));
        assert!(chat.is_group);
        assert_eq!(member.role, "ADMIN");
    }

    #[tokio::test]
    async fn test_membership_queries() {
        let pool = test_pool().await;
        let alice = create_user(&pool, "alice", "hash").await.unwrap();
        let bob = create_user(&pool, "bob", "hash").await.unwrap();

        let (chat, _) = create_chat(&pool, alice.id, None, false).await.unwrap();

        assert!(is_chat_member(&pool, chat.id, alice.id).await.unwrap());
        assert!(!is_chat_member(&pool, chat.id, bob.id).await.unwrap());

        add_chat_member(&pool, chat.id, bob.id).await.unwrap();
        assert!(is_chat_member(&pool, chat.id, bob.id).await.unwrap());

        assert_eq!(chat_ids_for_user(&pool, alice.id).await.unwrap(), vec![chat.id]);
        assert_eq!(chat_ids_for_user(&pool, bob.id).await.unwrap(), vec![chat.id]);
    }

    #[tokio::test]
    async fn test_duplicate_membership_rejected() {
        let pool = test_pool().await;
        let alice = create_user(&pool, "alice", "hash").await.unwrap();
        let (chat, _) = create_chat(&pool, alice.id, None, false).await.unwrap();

        // Creator already has a membership row; (user, chat) is unique.
        assert!(add_chat_member(&pool, chat.id, alice.id).await.is_err());
    }

    #[tokio::test]
    async fn test_chat_summaries_carry_count_and_last_message() {
        let pool = test_pool().await;
        let alice = create_user(&pool, "alice", "hash").await.unwrap();
        let bob = create_user(&pool, "bob", "hash").await.unwrap();

        let (chat, _) = create_chat(&pool, alice.id, Some("room".into()), true).await.unwrap();
        add_chat_member(&pool, chat.id, bob.id).await.unwrap();

        create_message(&pool, chat.id, alice.id, "first").await.unwrap();
        let latest = create_message(&pool, chat.id, bob.id, "second").await.unwrap();

        let summaries = chats_for_user(&pool, alice.id).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].member_count, 2);

        let last = summaries[0].last_message.as_ref().unwrap();
        assert_eq!(last.id, latest.id);
        assert_eq!(last.text, "second");

        // Bob sees the same chat; a stranger sees none.
        assert_eq!(chats_for_user(&pool, bob.id).await.unwrap().len(), 1);
        let carol = create_user(&pool, "carol", "hash").await.unwrap();
        assert!(chats_for_user(&pool, carol.id).await.unwrap().is_empty());
    }
}
