/**
 * Chat HTTP Handlers
 *
 * POST /api/chats and GET /api/chats.
 *
 * These endpoints use the `message` body key for their failures and treat
 * an empty chat list as 404 - both preserved client-facing conventions.
 */

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::chats::db::{self, Chat, ChatMember, ChatSummary};
use crate::error::ApiError;
use crate::middleware::AuthUser;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChatRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub is_group: bool,
}

/// The created chat together with its initial membership.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    #[serde(flatten)]
    pub chat: Chat,
    pub members: Vec<ChatMember>,
}

/// Create a chat with the caller as its only member.
///
/// # Errors
///
/// * `400 Bad Request` - group chat without a name (no row is created)
/// * `500 Internal Server Error` - store failure
pub async fn create_chat(
    State(pool): State<SqlitePool>,
    AuthUser(user): AuthUser,
    body: Result<Json<CreateChatRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ChatResponse>), ApiError> {
    let Json(request) = body?;

    let name = request.name.filter(|n| !n.is_empty());

    if request.is_group && name.is_none() {
        return Err(ApiError::bad_request("Group chat must have a name"));
    }

    let (chat, member) = db::create_chat(&pool, user.id, name, request.is_group).await?;

    tracing::info!("Chat {} created by {}", chat.id, user.username);
    Ok((
        StatusCode::CREATED,
        Json(ChatResponse {
            chat,
            members: vec![member],
        }),
    ))
}

/// List the caller's chats.
///
/// # Errors
///
/// * `404 Not Found` - the caller belongs to no chats
/// * `500 Internal Server Error` - store failure
pub async fn get_chats(
    State(pool): State<SqlitePool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ChatSummary>>, ApiError> {
    let chats = db::chats_for_user(&pool, user.id).await?;

    if chats.is_empty() {
        return Err(ApiError::not_found("No chats found").with_message_key());
    }

    Ok(Json(chats))
}
