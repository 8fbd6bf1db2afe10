//! Application state shared across all handlers.
//!
//! Storage backends are injected here as trait objects so handlers never
//! know whether they talk to PostgreSQL or to the in-memory store.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::auth::jwt::JwtService;
use crate::config::Config;
use crate::storage::{IdeaStorage, InMemoryIdeaStorage, InMemoryTenantStorage, TenantStorage};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Idea, comment and supporter storage
    pub ideas: Arc<dyn IdeaStorage>,
    /// Tenant lookup by domain
    pub tenants: Arc<dyn TenantStorage>,
    /// Application configuration
    pub config: Config,
    /// JWT authentication service
    pub jwt_service: JwtService,
    /// Prometheus exporter handle; absent when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        ideas: Arc<dyn IdeaStorage>,
        tenants: Arc<dyn TenantStorage>,
        config: Config,
    ) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration);
        Self {
            ideas,
            tenants,
            config,
            jwt_service,
            metrics_handle: None,
        }
    }

    /// State backed by fresh in-memory stores
    pub fn in_memory(config: Config) -> Self {
        Self::new(
            Arc::new(InMemoryIdeaStorage::new()),
            Arc::new(InMemoryTenantStorage::new()),
            config,
        )
    }

    /// State around an existing idea store, as used by handler tests
    pub fn with_ideas(ideas: Arc<dyn IdeaStorage>) -> Self {
        Self::new(ideas, Arc::new(InMemoryTenantStorage::new()), Config::default())
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}
