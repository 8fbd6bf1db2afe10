//! Public routes that don't resolve a tenant.
//!
//! Includes: health check, Prometheus metrics, Swagger UI.

use axum::{routing::get, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::handlers::{self, health};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Feedback API",
        version = "0.1.0",
        description = "Multi-tenant ideas, comments and supporters"
    ),
    paths(
        // Health
        crate::handlers::health::health_check,
        crate::handlers::metrics::get_prometheus_metrics,

        // Ideas
        crate::handlers::ideas::list_ideas,
        crate::handlers::ideas::idea_details,
        crate::handlers::ideas::post_idea,
        crate::handlers::ideas::post_comment,
        crate::handlers::ideas::add_supporter,
        crate::handlers::ideas::remove_supporter,
    ),
    components(schemas(
        crate::handlers::health::HealthStatus,
        crate::models::Idea,
        crate::models::IdeaDetails,
        crate::models::Comment,
        crate::models::NewIdeaRequest,
        crate::models::NewCommentRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "metrics", description = "Prometheus metrics"),
        (name = "ideas", description = "Ideas, comments and supporters of the current tenant"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued for the acting user"))
                    .build(),
            ),
        )
    }
}

/// Build routes that are served regardless of the request host.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/metrics", get(handlers::metrics::get_prometheus_metrics))
        // Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
}
