//! API route definitions

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::handlers::AppState;
use crate::config::ServerConfig;

/// Create RESTful API router
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Question answering
        .route("/chat", post(handlers::chat))
        .route("/chat/", post(handlers::chat))
        // Document services
        .route("/analyze", post(handlers::analyze_document))
        .route("/analyze/", post(handlers::analyze_document))
        .route("/verify-contract", post(handlers::verify_contract))
        .route("/verify-contract/", post(handlers::verify_contract))
        .with_state(state)
}

/// Full application: `/api` routes plus body limit, timeout, tracing and optional CORS
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut app = Router::new().nest("/api", api_routes(state)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
    );

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}
