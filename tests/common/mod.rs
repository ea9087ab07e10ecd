//! Shared helpers for the integration suite.
//!
//! Every test runs against a fresh in-memory SQLite database with the
//! real migrations applied, served through the real router.

#![allow(dead_code)]

use axum_test::TestServer;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use chatterbox::server::{create_app, AppState};

/// A single connection, because each `sqlite::memory:` connection gets
/// its own database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations apply cleanly");
    pool
}

/// Fresh app state over a fresh database.
pub async fn test_state() -> AppState {
    AppState::new(memory_pool().await)
}

/// Server plus the state behind it, for tests that need to reach the
/// connection registry directly.
pub async fn spawn_server() -> (TestServer, AppState) {
    let state = test_state().await;
    let server = TestServer::new(create_app(state.clone())).expect("test server");
    (server, state)
}

/// Register a user and return the response body
/// (`{user, accessToken, refreshToken}`).
pub async fn register_user(server: &TestServer, username: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/register")
        .json(&json!({ "username": username, "password": password }))
        .await;
    assert_eq!(response.status_code(), 201, "register {} failed", username);
    response.json::<Value>()
}

/// Register a user and return just their access token.
pub async fn register_and_token(server: &TestServer, username: &str, password: &str) -> String {
    register_user(server, username, password).await["accessToken"]
        .as_str()
        .expect("access token")
        .to_string()
}

/// Create a chat as the given user and return its id.
pub async fn create_chat(server: &TestServer, token: &str, body: Value) -> String {
    let response = server
        .post("/api/chats")
        .authorization_bearer(token)
        .json(&body)
        .await;
    assert_eq!(response.status_code(), 201, "create chat failed");
    response.json::<Value>()["id"]
        .as_str()
        .expect("chat id")
        .to_string()
}
