use async_trait::async_trait;

use super::StorageResult;
use crate::models::{Comment, Idea};

/// Tenant-scoped idea storage.
///
/// Every operation takes the tenant id first; implementations must never
/// return or mutate data belonging to another tenant.
#[async_trait]
pub trait IdeaStorage: Send + Sync {
    /// All ideas of a tenant, ordered by number
    async fn get_all(&self, tenant_id: i32) -> StorageResult<Vec<Idea>>;

    /// Find an idea by its store-wide id
    async fn get_by_id(&self, tenant_id: i32, id: i32) -> StorageResult<Idea>;

    /// Find an idea by its per-tenant number
    async fn get_by_number(&self, tenant_id: i32, number: i32) -> StorageResult<Idea>;

    /// Store a new idea under the next number of the tenant.
    ///
    /// The author becomes the first supporter.
    async fn save(
        &self,
        tenant_id: i32,
        user_id: i32,
        title: &str,
        description: &str,
    ) -> StorageResult<Idea>;

    /// Comment on the idea with the given number
    async fn add_comment(
        &self,
        tenant_id: i32,
        user_id: i32,
        number: i32,
        content: &str,
    ) -> StorageResult<Comment>;

    /// Comments of an idea, oldest first
    async fn get_comments(&self, tenant_id: i32, number: i32) -> StorageResult<Vec<Comment>>;

    /// Register `user_id` as supporter. Supporting twice is a no-op.
    async fn add_supporter(&self, tenant_id: i32, user_id: i32, number: i32)
        -> StorageResult<Idea>;

    /// Withdraw support. Removing a non-supporter is a no-op.
    async fn remove_supporter(
        &self,
        tenant_id: i32,
        user_id: i32,
        number: i32,
    ) -> StorageResult<Idea>;
}
