/**
 * JWT Token Service
 *
 * Issues and verifies the signed access and refresh tokens that gate both
 * HTTP requests and realtime handshakes. Both token kinds are HS256 JWTs
 * over the same process-wide secret; they differ only in expiry.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Access tokens expire after one hour.
pub const ACCESS_TOKEN_TTL_SECS: u64 = 60 * 60;

/// Refresh tokens expire after seven days.
pub const REFRESH_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID (UUID, string form)
    pub sub: String,
    /// Username
    pub username: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    /// Parse the subject back into a user id.
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

static JWT_SECRET: OnceLock<String> = OnceLock::new();

/// Signing secret, read from `JWT_SECRET` once per process.
///
/// Falls back to a fixed default so the server can run without
/// configuration. The default is only acceptable outside production.
fn jwt_secret() -> &'static str {
    JWT_SECRET.get_or_init(|| {
        std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using the built-in development secret");
            "default_secret_key".to_string()
        })
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn issue_token(
    user_id: Uuid,
    username: &str,
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = unix_now();
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    let key = EncodingKey::from_secret(jwt_secret().as_ref());
    encode(&Header::default(), &claims, &key)
}

/// Issue a short-lived access token for a user. No side effects.
pub fn issue_access_token(
    user_id: Uuid,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token(user_id, username, ACCESS_TOKEN_TTL_SECS)
}

/// Issue a long-lived refresh token for a user. No side effects; the
/// caller is responsible for persisting the matching store record.
pub fn issue_refresh_token(
    user_id: Uuid,
    username: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    issue_token(user_id, username, REFRESH_TOKEN_TTL_SECS)
}

/// Verify a token's signature and expiry.
///
/// Any failure (bad signature, malformed token, expired) comes back as an
/// `Err` the caller branches on; verification failure is a normal outcome,
/// not a fault.
pub fn verify_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(jwt_secret().as_ref());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}
