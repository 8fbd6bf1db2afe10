//! Handler test harness.
//!
//! `MockServer` runs a single handler against a hand-built request context:
//! the tenant and user go into request extensions, exactly where the tenant
//! and auth middleware put them, and route parameters are mapped onto a path
//! template so `Path` extractors see them.
//!
//! ```ignore
//! let mut server = MockServer::new(AppState::with_ideas(ideas));
//! server.context.set_tenant(Tenant::new(1, "Any Tenant", "any"));
//! server.context.set_param_names(&["number"]);
//! server.context.set_param_values(&["1"]);
//! let (status, body) = server.execute(handlers::ideas::idea_details).await?;
//! ```

use anyhow::{bail, Result};
use axum::{
    body::Body,
    handler::Handler,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    routing::any,
    Extension, Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use crate::app_state::AppState;
use crate::models::{Tenant, User};

/// Request context handed to the handler under test
#[derive(Debug, Clone, Default)]
pub struct MockContext {
    tenant: Option<Tenant>,
    user: Option<User>,
    param_names: Vec<String>,
    param_values: Vec<String>,
}

impl MockContext {
    pub fn set_tenant(&mut self, tenant: Tenant) {
        self.tenant = Some(tenant);
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn set_param_names<S: AsRef<str>>(&mut self, names: &[S]) {
        self.param_names = names.iter().map(|n| n.as_ref().to_string()).collect();
    }

    pub fn set_param_values<S: AsRef<str>>(&mut self, values: &[S]) {
        self.param_values = values.iter().map(|v| v.as_ref().to_string()).collect();
    }

    /// Route template and concrete URI for the configured parameters
    fn paths(&self) -> Result<(String, String)> {
        if self.param_names.len() != self.param_values.len() {
            bail!(
                "{} route parameter names but {} values",
                self.param_names.len(),
                self.param_values.len()
            );
        }
        if self.param_names.is_empty() {
            return Ok(("/".to_string(), "/".to_string()));
        }
        if self.param_values.iter().any(|v| v.is_empty() || v.contains('/')) {
            bail!("route parameter values must be non-empty path segments");
        }

        let template = self
            .param_names
            .iter()
            .map(|name| format!("/{{{}}}", name))
            .collect::<String>();
        let uri = self
            .param_values
            .iter()
            .map(|value| format!("/{}", value))
            .collect::<String>();
        Ok((template, uri))
    }
}

/// Executes handlers in isolation and captures status code and body
pub struct MockServer {
    state: AppState,
    pub context: MockContext,
}

impl MockServer {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            context: MockContext::default(),
        }
    }

    /// Run `handler` as a GET request
    pub async fn execute<H, T>(&self, handler: H) -> Result<(StatusCode, String)>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.run(handler, Method::GET, None).await
    }

    /// Run `handler` as a POST request with a JSON `body`
    pub async fn execute_post<H, T>(&self, handler: H, body: &str) -> Result<(StatusCode, String)>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        self.run(handler, Method::POST, Some(body)).await
    }

    async fn run<H, T>(
        &self,
        handler: H,
        method: Method,
        body: Option<&str>,
    ) -> Result<(StatusCode, String)>
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        let (template, uri) = self.context.paths()?;

        let mut router: Router<AppState> = Router::new().route(&template, any(handler));
        if let Some(tenant) = &self.context.tenant {
            router = router.layer(Extension(tenant.clone()));
        }
        if let Some(user) = &self.context.user {
            router = router.layer(Extension(user.clone()));
        }
        let app = router.with_state(self.state.clone());

        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = app.oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();

        Ok((status, String::from_utf8_lossy(&bytes).into_owned()))
    }
}
