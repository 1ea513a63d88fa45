//! Route configuration and setup

use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router<()> {
    let max_clients = state.config.max_clients;

    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/{*path}", get(handlers::image::serve_image))
        .with_state(state)
        .layer(ConcurrencyLimitLayer::new(max_clients))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
}
