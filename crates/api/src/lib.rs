//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes
//! - Request parsing and default-filling at the boundary
//! - Response types

pub mod error;
pub mod routes;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use budgetcast_shared::AppConfig;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Loaded application configuration.
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Creates state from a loaded configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
