/**
 * User and Refresh Token Persistence
 *
 * Database operations for the credential store: user lookup/creation and
 * the refresh-token records that back revocation.
 */

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::tokens::REFRESH_TOKEN_TTL_SECS;

/// A user row. The password hash never leaves this layer except into
/// `bcrypt::verify`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A persisted refresh-token record.
///
/// The row is the source of truth for revocation: a refresh token whose
/// signature verifies is still refused unless this row exists and is
/// unexpired. Logout deletes the row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub user_agent: String,
    pub ip: String,
}

impl RefreshTokenRecord {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

/// Requester metadata stored alongside a refresh token.
#[derive(Debug, Clone, Default)]
pub struct SessionMeta {
    pub ip: String,
    pub user_agent: String,
}

/// Look up a user by username.
pub async fn find_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, created_at
        FROM users
        WHERE username = ?1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

/// Create a user with an already-hashed password.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, password_hash, created_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, username, password_hash, created_at
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Persist a refresh-token record with a 7-day expiry.
///
/// A user may hold several live records at once, one per device/session.
pub async fn save_refresh_token(
    pool: &SqlitePool,
    user_id: Uuid,
    token: &str,
    meta: &SessionMeta,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    let expires_at = now + Duration::seconds(REFRESH_TOKEN_TTL_SECS as i64);

    sqlx::query(
        r#"
        INSERT INTO refresh_tokens (token, user_id, expires_at, created_at, user_agent, ip)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .bind(now)
    .bind(&meta.user_agent)
    .bind(&meta.ip)
    .execute(pool)
    .await?;

    Ok(())
}

/// Look up a refresh-token record by exact token string.
pub async fn find_refresh_token(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<RefreshTokenRecord>, sqlx::Error> {
    sqlx::query_as::<_, RefreshTokenRecord>(
        r#"
        SELECT token, user_id, expires_at, created_at, user_agent, ip
        FROM refresh_tokens
        WHERE token = ?1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

/// Delete a refresh-token record. Deleting a token that does not exist is
/// not an error, which makes logout idempotent.
pub async fn revoke_refresh_token(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM refresh_tokens WHERE token = ?1")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}
