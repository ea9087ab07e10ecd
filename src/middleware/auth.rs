/**
 * Authentication Middleware
 *
 * Protects routes that require a logged-in user. Extracts the bearer token
 * from the Authorization header, verifies it, and attaches the
 * authenticated principal to request extensions for handlers to read.
 *
 * One verification attempt per request; no retries, no store lookups.
 */

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::tokens::verify_token;
use crate::error::ApiError;

/// Authenticated principal derived from a verified access token.
///
/// Never carries the password hash or any store-side state; it is
/// recomputed per request from the token claims.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

/// Authentication middleware for protected routes.
///
/// - Missing or malformed `Authorization: Bearer <token>` header
///   -> 401 `{"error": "Authorization header missing or invalid"}`
/// - Token present but fails verification (bad signature, malformed,
///   expired, or a subject that is not a UUID)
///   -> 401 `{"error": "Invalid or expired token"}`
/// - Otherwise the principal is attached and the request proceeds.
pub async fn auth_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            tracing::debug!("Missing or malformed Authorization header");
            ApiError::unauthorized("Authorization header missing or invalid")
        })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::debug!("Token verification failed: {:?}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    // A subject we cannot parse means a token we never issued.
    let user_id = claims.user_id().map_err(|e| {
        tracing::warn!("Token subject is not a user id: {:?}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        id: user_id,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

/// Extractor for the authenticated principal set by [`auth_middleware`].
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                ApiError::unauthorized("Unauthorized: user id missing").with_message_key()
            })?;

        Ok(AuthUser(user))
    }
}
