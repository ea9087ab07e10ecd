/**
 * Message HTTP Handlers
 *
 * POST /api/chats/{chatId}/messages and
 * GET  /api/chats/{chatId}/messages?cursor&limit
 *
 * Membership is re-checked on every call rather than cached from
 * connection time, because membership can change in between. The send
 * path persists before it broadcasts, so nothing ever appears on the
 * realtime channel that a paginated fetch would not eventually return.
 */

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::chats::db::is_chat_member;
use crate::error::ApiError;
use crate::messages::db::{self, MessageWithSender};
use crate::messages::pagination::{paginate, PaginatedResult};
use crate::middleware::AuthUser;
use crate::realtime::{ChatRegistry, RoomEvent};

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MessagesQuery {
    pub cursor: Option<Uuid>,
    pub limit: Option<usize>,
}

impl MessagesQuery {
    fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

fn not_in_chat() -> ApiError {
    ApiError::forbidden("You are not in this chat")
}

/// Persist a message and fan it out to the chat's live subscribers.
///
/// The broadcast runs strictly after durable persistence and its outcome
/// is deliberately ignored: the message is committed, so the request
/// succeeds no matter what happens on the realtime side.
///
/// # Errors
///
/// * `400 Bad Request` - text missing or empty
/// * `403 Forbidden` - sender is not a member of the chat
/// * `500 Internal Server Error` - store failure (no broadcast attempted)
pub async fn send_message(
    State(pool): State<SqlitePool>,
    State(registry): State<ChatRegistry>,
    AuthUser(user): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageWithSender>), ApiError> {
    let Path(chat_id) = path?;
    let Json(request) = body?;

    let text = request
        .text
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Message text is required"))?;

    if !is_chat_member(&pool, chat_id, user.id).await? {
        return Err(not_in_chat());
    }

    let message = db::create_message(&pool, chat_id, user.id, &text).await?;

    registry.broadcast(
        chat_id,
        RoomEvent {
            chat_id,
            id: message.id,
            text: message.text.clone(),
            timestamp: message.created_at,
            sender_id: message.sender_id,
            sender_username: message.sender_username.clone(),
        },
    );

    Ok((StatusCode::CREATED, Json(message)))
}

/// Fetch a page of a chat's history, newest first.
///
/// # Errors
///
/// * `403 Forbidden` - caller is not a member of the chat
/// * `404 Not Found` - the page is empty
/// * `500 Internal Server Error` - store failure
pub async fn get_messages(
    State(pool): State<SqlitePool>,
    AuthUser(user): AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<MessagesQuery>, QueryRejection>,
) -> Result<Json<PaginatedResult<MessageWithSender>>, ApiError> {
    let Path(chat_id) = path?;
    let Query(query) = query?;

    if !is_chat_member(&pool, chat_id, user.id).await? {
        return Err(not_in_chat());
    }

    let limit = query.limit();
    let fetched = db::messages_page(&pool, chat_id, query.cursor, limit as i64 + 1).await?;
    let page = paginate(fetched, limit);

    if page.items.is_empty() {
        return Err(ApiError::not_found("No messages found"));
    }

    Ok(Json(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::create_user;
    use crate::chats::db::create_chat;
    use crate::messages::db::count_messages;
    use crate::middleware::AuthenticatedUser;
    use crate::server::config::test_pool;

    async fn principal(pool: &SqlitePool, username: &str) -> AuthUser {
        let user = create_user(pool, username, "hash").await.unwrap();
        AuthUser(AuthenticatedUser {
            id: user.id,
            username: user.username,
        })
    }

    fn text_body(text: Option<&str>) -> Result<Json<SendMessageRequest>, JsonRejection> {
        Ok(Json(SendMessageRequest {
            text: text.map(|t| t.to_string()),
        }))
    }

    #[tokio::test]
    async fn test_send_persists_then_broadcasts() {
        let pool = test_pool().await;
        let registry = ChatRegistry::new();
        let alice = principal(&pool, "alice").await;
        let (chat, _) = create_chat(&pool, alice.0.id, None, false).await.unwrap();

        let mut rx = registry.subscribe(chat.id);

        let (status, Json(message)) = send_message(
            State(pool.clone()),
            State(registry),
            alice,
            Ok(Path(chat.id)),
            text_body(Some("hi")),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(message.text, "hi");
        assert_eq!(message.sender_username, "alice");

        let event = rx.recv().await.unwrap();
        assert_eq!(event.id, message.id);
        assert_eq!(event.text, "hi");
        assert_eq!(event.sender_username, "alice");

        assert_eq!(count_messages(&pool, chat.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_send_empty_text_is_400() {
        let pool = test_pool().await;
        let alice = principal(&pool, "alice").await;
        let (chat, _) = create_chat(&pool, alice.0.id, None, false).await.unwrap();

        for body in [text_body(None), text_body(Some(""))] {
            let err = send_message(
                State(pool.clone()),
                State(ChatRegistry::new()),
                alice.clone(),
                Ok(Path(chat.id)),
                body,
            )
            .await
            .unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }

        assert_eq!(count_messages(&pool, chat.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_only_text_is_accepted() {
        let pool = test_pool().await;
        let alice = principal(&pool, "alice").await;
        let (chat, _) = create_chat(&pool, alice.0.id, None, false).await.unwrap();

        // Only absent or empty text is refused; whitespace is a message.
        let (status, Json(message)) = send_message(
            State(pool.clone()),
            State(ChatRegistry::new()),
            alice,
            Ok(Path(chat.id)),
            text_body(Some("   ")),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(message.text, "   ");
        assert_eq!(count_messages(&pool, chat.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_send_by_non_member_persists_nothing() {
        let pool = test_pool().await;
        let alice = principal(&pool, "alice").await;
        let bob = principal(&pool, "bob").await;
        let (chat, _) = create_chat(&pool, alice.0.id, None, false).await.unwrap();

        let err = send_message(
            State(pool.clone()),
            State(ChatRegistry::new()),
            bob,
            Ok(Path(chat.id)),
            text_body(Some("intruder")),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "You are not in this chat");
        assert_eq!(count_messages(&pool, chat.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_messages_by_non_member_is_403() {
        let pool = test_pool().await;
        let alice = principal(&pool, "alice").await;
        let bob = principal(&pool, "bob").await;
        let (chat, _) = create_chat(&pool, alice.0.id, None, false).await.unwrap();

        let err = get_messages(
            State(pool),
            bob,
            Ok(Path(chat.id)),
            Ok(Query(MessagesQuery::default())),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_get_messages_empty_chat_is_404() {
        let pool = test_pool().await;
        let alice = principal(&pool, "alice").await;
        let (chat, _) = create_chat(&pool, alice.0.id, None, false).await.unwrap();

        let err = get_messages(
            State(pool),
            alice,
            Ok(Path(chat.id)),
            Ok(Query(MessagesQuery::default())),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "No messages found");
    }

    #[tokio::test]
    async fn test_single_message_page_has_no_cursor() {
        let pool = test_pool().await;
        let registry = ChatRegistry::new();
        let alice = principal(&pool, "alice").await;
        let (chat, _) = create_chat(&pool, alice.0.id, None, false).await.unwrap();

        send_message(
            State(pool.clone()),
            State(registry),
            alice.clone(),
            Ok(Path(chat.id)),
            text_body(Some("hi")),
        )
        .await
        .unwrap();

        let Json(page) = get_messages(
            State(pool),
            alice,
            Ok(Path(chat.id)),
            Ok(Query(MessagesQuery {
                cursor: None,
                limit: Some(1),
            })),
        )
        .await
        .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].text, "hi");
        assert!(!page.meta.has_more);
        assert_eq!(page.meta.next_cursor, None);
    }
}
