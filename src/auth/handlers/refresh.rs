/**
 * Token Refresh Handler
 *
 * POST /api/auth/refresh
 *
 * A refresh token is honored only when BOTH checks pass: the signature and
 * expiry verify, and an unexpired record is found in the store by exact
 * string match. The store record is the source of truth for revocation.
 *
 * The status codes distinguish the failure modes: 401 means the credential
 * itself is bad (missing or failed verification); 403 means the signature
 * is valid but the token is no longer authorized (revoked or the record
 * expired). Refresh tokens are never rotated on use - a successful refresh
 * re-issues an access token only.
 */

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use sqlx::SqlitePool;

use crate::auth::handlers::types::{AccessTokenResponse, RefreshTokenRequest};
use crate::auth::store::find_refresh_token;
use crate::auth::tokens::{issue_access_token, verify_token};
use crate::error::ApiError;

/// Exchange a live refresh token for a fresh access token.
///
/// # Errors
///
/// * `401 Unauthorized` - token missing/empty or failed verification
/// * `403 Forbidden` - token verified but no matching unexpired record
/// * `500 Internal Server Error` - store or signing failure
pub async fn refresh(
    State(pool): State<SqlitePool>,
    body: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccessTokenResponse>), ApiError> {
    let Json(request) = body?;

    let refresh_token = request
        .into_token()
        .ok_or_else(|| ApiError::unauthorized("Refresh token is required"))?;

    let claims = verify_token(&refresh_token)
        .map_err(|_| ApiError::unauthorized("Invalid refresh token"))?;
    let user_id = claims
        .user_id()
        .map_err(|_| ApiError::unauthorized("Invalid refresh token"))?;

    let record = find_refresh_token(&pool, &refresh_token).await?;
    match record {
        Some(record) if !record.is_expired() => {}
        _ => return Err(ApiError::forbidden("Refresh token not found or expired")),
    }

    let access_token = issue_access_token(user_id, &claims.username)?;

    Ok((StatusCode::OK, Json(AccessTokenResponse { access_token })))
}
