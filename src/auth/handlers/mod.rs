/**
 * Authentication HTTP Handlers
 *
 * The login / register / refresh / logout state machine over the credential
 * store, plus the `/api/user/me` endpoint.
 */

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;
pub mod types;

pub use login::login;
pub use logout::logout;
pub use me::me;
pub use refresh::refresh;
pub use register::register;

use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use sqlx::SqlitePool;

use crate::auth::store::{self, SessionMeta, User};
use crate::auth::tokens::{issue_access_token, issue_refresh_token};
use crate::error::ApiError;
use types::{AuthResponse, UserDto};

/// Requester metadata recorded with each refresh token.
///
/// The client ip comes from `X-Forwarded-For` when present (the server is
/// expected to sit behind a proxy); both fields default to empty strings.
pub(crate) fn session_meta(headers: &HeaderMap) -> SessionMeta {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string();
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .unwrap_or("")
        .trim()
        .to_string();

    SessionMeta { ip, user_agent }
}

/// Issue an access/refresh token pair for a user and persist the refresh
/// token record. Shared by login and register.
pub(crate) async fn issue_session(
    pool: &SqlitePool,
    user: &User,
    meta: &SessionMeta,
) -> Result<AuthResponse, ApiError> {
    let access_token = issue_access_token(user.id, &user.username)?;
    let refresh_token = issue_refresh_token(user.id, &user.username)?;

    store::save_refresh_token(pool, user.id, &refresh_token, meta).await?;

    Ok(AuthResponse {
        user: UserDto {
            id: user.id,
            username: user.username.clone(),
        },
        access_token,
        refresh_token,
    })
}
