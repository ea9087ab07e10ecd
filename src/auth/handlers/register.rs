/**
 * Register Handler
 *
 * POST /api/auth/register
 *
 * Missing fields are a client-input error (400), unlike login's 401, since
 * no credential matching is involved yet.
 */

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use sqlx::SqlitePool;

use crate::auth::handlers::types::{AuthResponse, CredentialsRequest};
use crate::auth::handlers::{issue_session, session_meta};
use crate::auth::store::{create_user, find_user_by_username};
use crate::error::ApiError;

/// Create a user and issue an initial access/refresh token pair.
///
/// # Errors
///
/// * `400 Bad Request` - username or password missing/empty
/// * `409 Conflict` - username already taken
/// * `500 Internal Server Error` - store, hashing, or signing failure
pub async fn register(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = body?;

    let (username, password) = request
        .into_fields()
        .ok_or_else(|| ApiError::bad_request("Username and password are required"))?;

    if find_user_by_username(&pool, &username).await?.is_some() {
        return Err(ApiError::conflict("User already exists"));
    }

    let password_hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;
    let user = create_user(&pool, &username, &password_hash).await?;

    let response = issue_session(&pool, &user, &session_meta(&headers)).await?;

    tracing::info!("User registered: {}", user.username);
    Ok((StatusCode::CREATED, Json(response)))
}
