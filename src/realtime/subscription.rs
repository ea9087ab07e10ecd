/**
 * Real-time Subscription Handler
 *
 * GET /realtime?token=<access token>
 *
 * The persistent-connection handshake. The access token rides the `token`
 * query parameter (connection-establishment metadata - EventSource cannot
 * set headers), and the handshake is rejected before any stream is opened
 * when the token is missing or invalid.
 *
 * An accepted connection is subscribed to every chat the principal is a
 * member of at handshake time; there is no dynamic join/leave. Each new
 * message in one of those chats arrives as an SSE event named
 * `{chatId}:message`. Closing the connection drops the receivers, which
 * removes the connection from every subscriber set - including when the
 * client disappears mid-handshake, since the receivers are dropped with
 * the stream either way.
 */

use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::convert::Infallible;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::auth::tokens::verify_token;
use crate::chats::db::chat_ids_for_user;
use crate::error::ApiError;
use crate::realtime::registry::{ChatRegistry, RoomEvent};

#[derive(Debug, Deserialize)]
pub struct RealtimeParams {
    pub token: Option<String>,
}

fn sse_event(event: RoomEvent) -> Option<Result<Event, Infallible>> {
    let name = format!("{}:message", event.chat_id);
    match Event::default().event(name).json_data(&event) {
        Ok(sse) => Some(Ok(sse)),
        Err(e) => {
            tracing::error!("Failed to serialize realtime event: {:?}", e);
            None
        }
    }
}

/// Authenticate the handshake, subscribe to the principal's chats, and
/// stream their message events.
///
/// # Errors
///
/// * `401 Unauthorized` - token missing (`Token is required`) or failed
///   verification (`Unauthorized`); the connection never opens
/// * `500 Internal Server Error` - membership lookup failed
pub async fn realtime_subscription(
    State(pool): State<SqlitePool>,
    State(registry): State<ChatRegistry>,
    Query(params): Query<RealtimeParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let token = params
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::unauthorized("Token is required"))?;

    let claims = verify_token(&token).map_err(|e| {
        tracing::debug!("Realtime handshake rejected: {:?}", e);
        ApiError::unauthorized("Unauthorized")
    })?;
    let user_id = claims
        .user_id()
        .map_err(|_| ApiError::unauthorized("Unauthorized"))?;

    let chat_ids = chat_ids_for_user(&pool, user_id).await?;
    tracing::info!(
        "Realtime connection for {} subscribed to {} chat(s)",
        claims.username,
        chat_ids.len()
    );

    let receivers = registry.subscribe_all(&chat_ids);
    let merged = stream::select_all(receivers.into_iter().map(BroadcastStream::new))
        .filter_map(|result| async move {
            match result {
                Ok(event) => sse_event(event),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    // At-most-once: a lagged connection just misses events.
                    tracing::warn!("Realtime subscriber lagged, skipped {} events", skipped);
                    None
                }
            }
        });

    // Keep the connection open even when the principal has no chats yet
    // (or every channel closes); keep-alive comments do the rest.
    let events = stream::select(merged.boxed(), stream::pending().boxed());

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
