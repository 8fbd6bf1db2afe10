//! Router configuration module
//!
//! Public routes (health, metrics, docs) are merged with the tenant-scoped
//! idea routes; logging, tracing, timeout and CORS wrap everything.

mod ideas;
mod public;

use std::time::Duration;

use axum::{http::StatusCode, middleware::from_fn, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::app_state::AppState;
use crate::middleware::request_logger_middleware;

pub use ideas::idea_routes;
pub use public::{public_routes, ApiDoc};

/// Build the application router.
pub fn build_router(app_state: AppState) -> Router {
    let request_timeout = Duration::from_secs(app_state.config.request_timeout);

    public_routes()
        .merge(idea_routes(app_state.clone()))
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_logger_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state)
}
