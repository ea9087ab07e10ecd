/**
 * Application State
 *
 * The central state container handed to the router: the database pool and
 * the chat connection registry. Both are injected here rather than living
 * in globals so tests can construct their own.
 *
 * The `FromRef` impls let handlers extract just the part of the state
 * they need (`State<SqlitePool>`, `State<ChatRegistry>`) instead of the
 * whole `AppState`.
 */

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::realtime::ChatRegistry;

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool. Every data path goes through it; store
    /// failures surface as 500s, so there is no optional/degraded mode.
    pub pool: SqlitePool,

    /// Live chat subscriptions for this server process.
    pub registry: ChatRegistry,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            registry: ChatRegistry::new(),
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for ChatRegistry {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.registry.clone()
    }
}
