//! Tenant-scoped idea routes.
//!
//! Every route here runs behind `tenant_middleware`; writes additionally
//! need the user attached by `auth_middleware`.

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};

use crate::app_state::AppState;
use crate::auth::middleware::auth_middleware;
use crate::handlers::ideas;
use crate::middleware::{metrics_middleware, tenant_middleware};

/// Build the idea routes with their tenant and auth layers.
pub fn idea_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/ideas", get(ideas::list_ideas).post(ideas::post_idea))
        .route("/api/ideas/{number}", get(ideas::idea_details))
        .route("/api/ideas/{number}/comments", post(ideas::post_comment))
        .route(
            "/api/ideas/{number}/supporters",
            post(ideas::add_supporter).delete(ideas::remove_supporter),
        )
        .layer(from_fn_with_state(app_state.clone(), auth_middleware))
        .layer(from_fn_with_state(app_state, tenant_middleware))
        // outermost, so tenant and auth rejections are counted too
        .route_layer(from_fn(metrics_middleware))
}
