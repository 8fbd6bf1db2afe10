use async_trait::async_trait;

use super::StorageResult;
use crate::models::Tenant;

/// Lookup of tenants by the host-name label they are served under
#[async_trait]
pub trait TenantStorage: Send + Sync {
    async fn get_by_domain(&self, domain: &str) -> StorageResult<Tenant>;

    /// Register a tenant; fails with `Conflict` when the domain is taken
    async fn add(&self, name: &str, domain: &str) -> StorageResult<Tenant>;
}
