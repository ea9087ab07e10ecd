/**
 * Current User Handler
 *
 * GET /api/user/me - echoes the authenticated principal.
 */

use axum::response::Json;

use crate::auth::handlers::types::UserDto;
use crate::middleware::AuthUser;

pub async fn me(AuthUser(user): AuthUser) -> Json<UserDto> {
    Json(UserDto {
        id: user.id,
        username: user.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::AuthenticatedUser;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_me_returns_principal() {
        let id = Uuid::new_v4();
        let Json(dto) = me(AuthUser(AuthenticatedUser {
            id,
            username: "alice".to_string(),
        }))
        .await;

        assert_eq!(dto.id, id);
        assert_eq!(dto.username, "alice");
    }
}
