/**
 * Application Construction
 *
 * Builds the router from an `AppState` and spawns the registry pruning
 * task that drops broadcast channels nobody listens to anymore.
 */

use axum::Router;
use std::time::Duration;

use crate::routes::create_router;
use crate::server::state::AppState;

/// How often channels without subscribers are dropped from the registry.
const REGISTRY_PRUNE_INTERVAL: Duration = Duration::from_secs(300);

/// Assemble the application.
pub fn create_app(state: AppState) -> Router {
    let registry = state.registry.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(REGISTRY_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            registry.prune();
            tracing::debug!("Pruned idle chat channels");
        }
    });

    create_router(state)
}
