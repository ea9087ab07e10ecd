/**
 * Router Configuration
 *
 * Wires every endpoint into a single Axum router.
 *
 * # Routes
 *
 * Public:
 * - `POST /api/auth/register` - create a user, returns a token pair
 * - `POST /api/auth/login` - authenticate, returns a token pair
 * - `POST /api/auth/refresh` - exchange a refresh token for an access token
 * - `POST /api/auth/logout` - revoke a refresh token
 * - `GET  /realtime?token=` - SSE handshake (token is the handshake metadata)
 *
 * Bearer-authenticated (behind `auth_middleware`):
 * - `GET  /api/user/me`
 * - `POST /api/chats`, `GET /api/chats`
 * - `POST /api/chats/{chatId}/messages`, `GET /api/chats/{chatId}/messages`
 */

use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::{middleware, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::handlers::{login, logout, me, refresh, register};
use crate::chats::{create_chat, get_chats};
use crate::messages::{get_messages, send_message};
use crate::middleware::auth_middleware;
use crate::realtime::realtime_subscription;
use crate::server::state::AppState;

/// Create the router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout));

    let protected_routes = Router::new()
        .route("/user/me", get(me))
        .route("/chats", post(create_chat).get(get_chats))
        .route(
            "/chats/{chat_id}/messages",
            post(send_message).get(get_messages),
        )
        .layer(middleware::from_fn(auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", protected_routes)
        .route("/realtime", get(realtime_subscription))
        .fallback(|| async {
            (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
        })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
