//! Tenant resolution.
//!
//! The tenant is taken from the first label of the `Host` header
//! (`orange.example.com:3000` -> `orange`), or from `X-Tenant-Domain` when a
//! proxy forwards it explicitly. HTTP/2 requests carry the host in the URI
//! authority instead of a `Host` header.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{
    extract::{Request, State},
    http::{header::HOST, HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::Tenant;
use crate::storage::StorageError;

pub const TENANT_DOMAIN_HEADER: &str = "x-tenant-domain";

pub async fn tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(domain) = tenant_domain(request.headers(), request.uri()) else {
        warn!("Request without a resolvable tenant host");
        return ApiError::tenant_not_found().into_response();
    };

    match state.tenants.get_by_domain(&domain).await {
        Ok(tenant) => {
            debug!(tenant_id = tenant.id, domain = %domain, "Tenant resolved");
            request.extensions_mut().insert(tenant);
            next.run(request).await
        }
        Err(StorageError::NotFound(_)) => {
            debug!(domain = %domain, "Unknown tenant domain");
            ApiError::tenant_not_found().into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Extract the tenant domain label from request headers or URI authority
pub fn tenant_domain(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let explicit = headers
        .get(TENANT_DOMAIN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|d| !d.is_empty());
    if let Some(domain) = explicit {
        return Some(domain.to_lowercase());
    }

    let host = match headers.get(HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => host.split(':').next()?.trim(),
        None => uri.host()?,
    };
    let label = host.split('.').next()?;
    if label.is_empty() {
        None
    } else {
        Some(label.to_lowercase())
    }
}

/// Extractor for the tenant attached by `tenant_middleware`
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub Tenant);

impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Tenant>()
            .cloned()
            .map(CurrentTenant)
            .ok_or_else(ApiError::tenant_not_found)
    }
}
