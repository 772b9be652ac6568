//! # skillswap-api
//!
//! REST API layer for SkillSwap. Provides HTTP endpoints for all store
//! operations, authentication, and client-facing functionality.

pub mod auth;
pub mod middleware;
pub mod routes;

use axum::Router;
use skillswap_db::Database;
use std::sync::Arc;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::auth::router())
        .merge(routes::users::router())
        .merge(routes::skills::router())
        .merge(routes::conversations::router())
        .merge(routes::calls::router())
        .merge(routes::availability::router())
        .merge(routes::sessions::router())
        .merge(routes::ratings::router())
        .merge(routes::health::router());

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
