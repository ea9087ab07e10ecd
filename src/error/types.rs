/**
 * API Error Types
 *
 * This module defines the error type returned by HTTP handlers and the
 * single place where errors are shaped into JSON responses.
 *
 * # Error Categories
 *
 * - 400 Bad Request - malformed or missing input fields
 * - 401 Unauthorized - missing, invalid, or expired credentials
 * - 403 Forbidden - valid principal without permission (e.g. not a chat member)
 * - 404 Not Found - no data matches a valid query
 * - 409 Conflict - duplicate username
 * - 500 Internal Server Error - storage or signing failure, cause never leaked
 *
 * # Body Shape
 *
 * Failures are JSON objects with a single text field. Most endpoints use
 * the `error` key; the chat-list endpoints historically used `message` and
 * clients may depend on either, so both shapes are produced here and only
 * here via [`ErrorKey`].
 */

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

/// Which JSON key carries the error text in the response body.
///
/// The API shipped with two conventions (`{"error": ...}` for most
/// endpoints, `{"message": ...}` for a few); the inconsistency is kept for
/// client compatibility but contained to this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKey {
    Error,
    Message,
}

impl ErrorKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKey::Error => "error",
            ErrorKey::Message => "message",
        }
    }
}

/// Error returned by HTTP handlers.
///
/// Carries the status code, the body key convention, and the user-visible
/// message. Internal causes (database errors, signing errors) are logged at
/// the conversion site and replaced with a generic message.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    key: ErrorKey,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, key: ErrorKey, message: impl Into<String>) -> Self {
        Self {
            status,
            key,
            message: message.into(),
        }
    }

    /// 400 with an `error` body.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorKey::Error, message)
    }

    /// 401 with an `error` body.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ErrorKey::Error, message)
    }

    /// 403 with an `error` body.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, ErrorKey::Error, message)
    }

    /// 404 with an `error` body.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorKey::Error, message)
    }

    /// 409 with an `error` body.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ErrorKey::Error, message)
    }

    /// 500 with a generic `error` body. The cause must already be logged.
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKey::Error,
            "Internal server error",
        )
    }

    /// Switch the body to the `message` key convention.
    pub fn with_message_key(mut self) -> Self {
        self.key = ErrorKey::Message;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn key(&self) -> ErrorKey {
        self.key
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ self.key.as_str(): self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        Self::internal()
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        Self::internal()
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::error!("Token signing error: {:?}", err);
        Self::internal()
    }
}

// Extractor rejections (unparseable body, query string, or path segment)
// are client-input errors and get the same structured body as every other
// failure instead of axum's plain-text default.

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        tracing::debug!("Request body rejected: {}", err);
        Self::bad_request("Invalid request body")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        tracing::debug!("Query string rejected: {}", err);
        Self::bad_request("Invalid query parameters")
    }
}

impl From<PathRejection> for ApiError {
    fn from(err: PathRejection) -> Self {
        tracing::debug!("Path parameter rejected: {}", err);
        Self::bad_request("Invalid path parameter")
    }
}
