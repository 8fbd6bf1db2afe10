use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use std::time::Instant;

/// Metrics middleware that tracks request metrics.
///
/// Labels use the matched route template so idea numbers don't explode
/// label cardinality.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone())
        .increment(1);

    let response = next.run(request).await;
    let status = response.status().as_u16().to_string();

    histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .record(start.elapsed().as_secs_f64());

    counter!(
        "http_responses_total",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .increment(1);

    response
}

/// Track a newly posted idea
pub fn track_idea_created(tenant_id: i32) {
    counter!("ideas_created_total", "tenant" => tenant_id.to_string()).increment(1);
}

/// Track a newly posted comment
pub fn track_comment_created(tenant_id: i32) {
    counter!("comments_created_total", "tenant" => tenant_id.to_string()).increment(1);
}

/// Track support being given or withdrawn
pub fn track_support_change(tenant_id: i32, added: bool) {
    counter!(
        "supporter_changes_total",
        "tenant" => tenant_id.to_string(),
        "action" => if added { "add" } else { "remove" }
    )
    .increment(1);
}
