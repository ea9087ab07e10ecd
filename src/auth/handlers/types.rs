/**
 * Request and Response Types for Authentication
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body for login and register.
///
/// Fields are optional so that a missing field is handled by the endpoint's
/// own policy (401 for login, 400 for register) instead of a deserializer
/// rejection.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// Both fields present and non-empty, or nothing.
    pub fn into_fields(self) -> Option<(String, String)> {
        match (self.username, self.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u, p)),
            _ => None,
        }
    }
}

/// Public view of a user. Never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
}

/// Successful login/register response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserDto,
    pub access_token: String,
    pub refresh_token: String,
}

/// Body for refresh and logout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

impl RefreshTokenRequest {
    pub fn into_token(self) -> Option<String> {
        self.refresh_token.filter(|t| !t.is_empty())
    }
}

/// Successful refresh response. The refresh token itself is not rotated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_both_fields() {
        let both = CredentialsRequest {
            username: Some("alice".into()),
            password: Some("pw".into()),
        };
        assert_eq!(both.into_fields(), Some(("alice".into(), "pw".into())));

        let missing = CredentialsRequest {
            username: Some("alice".into()),
            password: None,
        };
        assert!(missing.into_fields().is_none());

        let empty = CredentialsRequest {
            username: Some("".into()),
            password: Some("pw".into()),
        };
        assert!(empty.into_fields().is_none());
    }

    #[test]
    fn test_refresh_request_rejects_empty_token() {
        let empty = RefreshTokenRequest {
            refresh_token: Some("".into()),
        };
        assert!(empty.into_token().is_none());

        let missing = RefreshTokenRequest {
            refresh_token: None,
        };
        assert!(missing.into_token().is_none());
    }
}
