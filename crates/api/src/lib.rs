//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST routes for claims, rule sets, actors and currencies
//! - Actor identification middleware
//! - JSON error responses

pub mod error;
pub mod middleware;
pub mod routes;

#[cfg(test)]
mod testing;

use axum::Router;
use spendflow_store::ExpenseStore;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The expense store.
    pub store: Arc<ExpenseStore>,
}

impl AppState {
    /// Wraps a store.
    #[must_use]
    pub fn new(store: ExpenseStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
