/**
 * Login Handler
 *
 * POST /api/auth/login
 *
 * # Security
 *
 * Missing field, unknown username, and wrong password all return the same
 * 401 body so nothing leaks about which part failed. A username miss still
 * pays a bcrypt verification against a fixed dummy hash so the miss is not
 * trivially distinguishable by timing either.
 */

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::Json;
use sqlx::SqlitePool;
use std::sync::OnceLock;

use crate::auth::handlers::types::{AuthResponse, CredentialsRequest};
use crate::auth::handlers::{issue_session, session_meta};
use crate::auth::store::find_user_by_username;
use crate::error::ApiError;

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid credentials")
}

/// Hash verified against when the username lookup misses.
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| {
        bcrypt::hash("dummy", bcrypt::DEFAULT_COST)
            .unwrap_or_else(|_| String::new())
    })
}

/// Authenticate a user and issue an access/refresh token pair.
///
/// # Errors
///
/// * `401 Unauthorized` - missing field, unknown user, or wrong password,
///   with an identical body in every case
/// * `500 Internal Server Error` - store or signing failure
pub async fn login(
    State(pool): State<SqlitePool>,
    headers: HeaderMap,
    body: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = body?;

    // A missing field can never match a stored hash, so it gets the same
    // generic 401 as a bad password.
    let (username, password) = request.into_fields().ok_or_else(invalid_credentials)?;

    tracing::info!("Login request for: {}", username);

    let user = find_user_by_username(&pool, &username).await?;

    let valid = match &user {
        Some(user) => bcrypt::verify(&password, &user.password_hash).unwrap_or(false),
        None => {
            let _ = bcrypt::verify(&password, dummy_hash());
            false
        }
    };

    let user = match user {
        Some(user) if valid => user,
        _ => {
            tracing::warn!("Invalid credentials for: {}", username);
            return Err(invalid_credentials());
        }
    };

    let response = issue_session(&pool, &user, &session_meta(&headers)).await?;

    tracing::info!("User logged in: {}", user.username);
    Ok((StatusCode::OK, Json(response)))
}
