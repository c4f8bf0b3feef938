//! Router configuration for the HTTP API.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::state::AppState;

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/charts/build", post(handlers::build_chart))
        .route("/charts/compare", post(handlers::compare_charts))
        .route("/charts/{chart_id}", get(handlers::get_chart))
        .layer(cors)
        .with_state(state)
}
