//! Ladle API - authenticated recipes REST server
//!
//! HTTP surface over the ladle-core entity stores: JWT cookie
//! authentication, owner-only authorization, declarative payload
//! validation, and PostgreSQL persistence.

pub mod auth;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repository;
pub mod routes;
pub mod state;
pub mod validation;

use axum::http::{header, HeaderValue, Method};
use axum::{middleware as axum_middleware, routing::get, Router};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Build the CORS layer from the configured origins. With no origins
/// configured the layer stays fully restrictive.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if origins.is_empty() {
        return CorsLayer::new();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Create the application router with all routes, middleware, and docs.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics))
        .nest("/api", routes::api_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::ApiDoc::openapi()))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::timeout::enforce_timeout,
        ))
        .layer(axum_middleware::from_fn(
            middleware::security_headers::security_headers,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::track_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Router wired to fresh in-memory stores, for integration tests.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_router_for_testing() -> Router {
    use repository::memory::{MemoryRecipeStore, MemoryUserStore};

    let state = Arc::new(AppState::new(
        ladle_core::AppConfig::default(),
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryRecipeStore::new()),
    ));

    create_router(state)
}
