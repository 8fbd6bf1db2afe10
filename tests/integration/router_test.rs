use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use feedback_api::config::Config;
use feedback_api::models::User;
use feedback_api::router::build_router;
use feedback_api::startup::seed_default_tenant;
use feedback_api::storage::TenantStorage;
use feedback_api::AppState;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: AppState,
}

async fn spawn_app() -> Result<TestApp> {
    let config = Config::default();
    let state = AppState::in_memory(config.clone());
    seed_default_tenant(&config, state.tenants.as_ref()).await?;
    state.tenants.add("Orange Inc.", "orange").await?;

    Ok(TestApp {
        router: build_router(state.clone()),
        state,
    })
}

impl TestApp {
    fn token_for(&self, user: &User) -> Result<String> {
        Ok(self.state.jwt_service.encode_token(user)?)
    }
}

async fn json_body(res: axum::response::Response) -> Result<Value> {
    let bytes = res.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

fn get(host: &str, uri: &str) -> Result<Request<Body>> {
    Ok(Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", host)
        .body(Body::empty())?)
}

fn post(host: &str, uri: &str, token: Option<&str>, body: Value) -> Result<Request<Body>> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("host", host)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    Ok(builder.body(Body::from(body.to_string()))?)
}

#[tokio::test]
async fn test_health_ok() -> Result<()> {
    let app = spawn_app().await?;

    let res = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get("x-request-id").is_some());
    let body = json_body(res).await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
    Ok(())
}

#[tokio::test]
async fn test_request_id_is_echoed() -> Result<()> {
    let app = spawn_app().await?;

    let res = app
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-42")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(
        res.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
    Ok(())
}

#[tokio::test]
async fn test_unknown_tenant_is_404() -> Result<()> {
    let app = spawn_app().await?;

    let res = app
        .router
        .oneshot(get("nobody.example.com", "/api/ideas")?)
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = json_body(res).await?;
    assert_eq!(body["error"]["code"], "RES_4002");
    Ok(())
}

#[tokio::test]
async fn test_error_body_carries_request_id() -> Result<()> {
    let app = spawn_app().await?;

    let res = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/ideas")
                .header("host", "nobody.example.com")
                .header("x-request-id", "req-7")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        res.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-7")
    );
    let body = json_body(res).await?;
    assert_eq!(body["request_id"], "req-7");
    Ok(())
}

#[test]
fn test_unknown_tenant_is_counted_in_metrics() -> Result<()> {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    let status = metrics::with_local_recorder(&recorder, || {
        tokio_test::block_on(async {
            let app = spawn_app().await?;
            let res = app
                .router
                .oneshot(get("nobody.example.com", "/api/ideas")?)
                .await?;
            Ok::<_, anyhow::Error>(res.status())
        })
    })?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let rendered = handle.render();
    assert!(rendered.lines().any(|line| {
        line.starts_with("http_responses_total")
            && line.contains(r#"path="/api/ideas""#)
            && line.contains(r#"status="404""#)
    }));
    Ok(())
}

#[tokio::test]
async fn test_list_ideas_for_host_tenant() -> Result<()> {
    let app = spawn_app().await?;

    let res = app
        .router
        .oneshot(get("demo.example.com:3000", "/api/ideas")?)
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await?, json!({ "items": [], "count": 0 }));
    Ok(())
}

#[tokio::test]
async fn test_anonymous_post_is_401() -> Result<()> {
    let app = spawn_app().await?;

    let res = app
        .router
        .oneshot(post(
            "demo.example.com",
            "/api/ideas",
            None,
            json!({ "title": "Anonymous idea" }),
        )?)
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_invalid_token_is_401() -> Result<()> {
    let app = spawn_app().await?;

    let res = app
        .router
        .oneshot(post(
            "demo.example.com",
            "/api/ideas",
            Some("not-a-token"),
            json!({ "title": "Forged idea" }),
        )?)
        .await?;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_post_idea_then_comment_then_details() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.token_for(&User::new(7, "Jon").with_email("jon@example.com"))?;

    let res = app
        .router
        .clone()
        .oneshot(post(
            "demo.example.com",
            "/api/ideas",
            Some(&token),
            json!({ "title": "Dark mode", "description": "Please" }),
        )?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let idea = json_body(res).await?;
    assert_eq!(idea["number"], 1);
    assert_eq!(idea["user_id"], 7);
    assert_eq!(idea["total_supporters"], 1);

    let res = app
        .router
        .clone()
        .oneshot(post(
            "demo.example.com",
            "/api/ideas/1/comments",
            Some(&token),
            json!({ "content": "+1" }),
        )?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .router
        .oneshot(get("demo.example.com", "/api/ideas/1")?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let details = json_body(res).await?;
    assert_eq!(details["idea"]["title"], "Dark mode");
    assert_eq!(details["idea"]["description"], "Please");
    assert_eq!(details["comments"][0]["content"], "+1");
    assert_eq!(details["comments"][0]["user_id"], 7);
    Ok(())
}

#[tokio::test]
async fn test_tenants_are_isolated() -> Result<()> {
    let app = spawn_app().await?;
    let token = app.token_for(&User::new(1, "Jon"))?;

    let res = app
        .router
        .clone()
        .oneshot(post(
            "orange.example.com",
            "/api/ideas",
            Some(&token),
            json!({ "title": "Orange only" }),
        )?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .router
        .clone()
        .oneshot(get("demo.example.com", "/api/ideas/1")?)
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = app
        .router
        .oneshot(get("orange.example.com", "/api/ideas")?)
        .await?;
    let body = json_body(res).await?;
    assert_eq!(body["count"], 1);
    assert_eq!(body["items"][0]["title"], "Orange only");
    Ok(())
}

#[tokio::test]
async fn test_supporters_route() -> Result<()> {
    let app = spawn_app().await?;
    let author = app.token_for(&User::new(1, "Jon"))?;
    let fan = app.token_for(&User::new(2, "Arya"))?;

    let res = app
        .router
        .clone()
        .oneshot(post(
            "demo.example.com",
            "/api/ideas",
            Some(&author),
            json!({ "title": "Supported" }),
        )?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app
        .router
        .clone()
        .oneshot(post(
            "demo.example.com",
            "/api/ideas/1/supporters",
            Some(&fan),
            Value::Null,
        )?)
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await?["total_supporters"], 2);

    let res = app
        .router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/ideas/1/supporters")
                .header("host", "demo.example.com")
                .header("authorization", format!("Bearer {}", fan))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await?["total_supporters"], 1);
    Ok(())
}

#[tokio::test]
async fn test_openapi_document_is_served() -> Result<()> {
    let app = spawn_app().await?;

    let res = app
        .router
        .oneshot(
            Request::builder()
                .uri("/api/docs/openapi.json")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let doc = json_body(res).await?;
    assert!(doc["paths"]["/api/ideas"].is_object());
    Ok(())
}
