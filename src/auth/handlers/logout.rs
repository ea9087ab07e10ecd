/**
 * Logout Handler
 *
 * POST /api/auth/logout
 *
 * Deletes the persisted refresh-token record; absence of the record is the
 * tombstone. Returns 200 whether or not a record existed, so logging out
 * twice with the same token succeeds both times.
 */

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::auth::handlers::types::RefreshTokenRequest;
use crate::auth::store::revoke_refresh_token;
use crate::auth::tokens::verify_token;
use crate::error::ApiError;

/// Revoke a refresh token.
///
/// # Errors
///
/// * `400 Bad Request` - token missing/empty
/// * `401 Unauthorized` - token failed verification (soft failure, same
///   policy as every other token-consuming endpoint)
/// * `500 Internal Server Error` - store failure
pub async fn logout(
    State(pool): State<SqlitePool>,
    body: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(request) = body?;

    let refresh_token = request
        .into_token()
        .ok_or_else(|| ApiError::bad_request("Refresh token is required"))?;

    verify_token(&refresh_token)
        .map_err(|_| ApiError::unauthorized("Invalid refresh token"))?;

    // Unconditional delete; a missing record means someone already
    // logged this session out, which is still a success.
    revoke_refresh_token(&pool, &refresh_token).await?;

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Logged out successfully" })),
    ))
}
