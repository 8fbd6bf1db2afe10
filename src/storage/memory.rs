//! In-memory storage backends.
//!
//! Used by the test suite and by `Config` runs without a `DATABASE_URL`.
//! State lives behind a `tokio::sync::RwLock`; writers hold the lock for the
//! whole operation so per-tenant numbering stays gap-free.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{IdeaStorage, StorageError, StorageResult, TenantStorage};
use crate::models::{Comment, Idea, Tenant};

#[derive(Debug)]
struct IdeaRecord {
    tenant_id: i32,
    idea: Idea,
    supporters: BTreeSet<i32>,
    comments: Vec<Comment>,
}

impl IdeaRecord {
    fn snapshot(&self) -> Idea {
        let mut idea = self.idea.clone();
        idea.total_supporters = self.supporters.len() as i32;
        idea
    }
}

#[derive(Debug, Default)]
struct IdeaState {
    last_idea_id: i32,
    last_comment_id: i32,
    records: Vec<IdeaRecord>,
}

impl IdeaState {
    fn find(&self, tenant_id: i32, number: i32) -> StorageResult<&IdeaRecord> {
        self.records
            .iter()
            .find(|r| r.tenant_id == tenant_id && r.idea.number == number)
            .ok_or_else(StorageError::idea_not_found)
    }

    fn find_mut(&mut self, tenant_id: i32, number: i32) -> StorageResult<&mut IdeaRecord> {
        self.records
            .iter_mut()
            .find(|r| r.tenant_id == tenant_id && r.idea.number == number)
            .ok_or_else(StorageError::idea_not_found)
    }

    fn next_number(&self, tenant_id: i32) -> i32 {
        self.records
            .iter()
            .filter(|r| r.tenant_id == tenant_id)
            .map(|r| r.idea.number)
            .max()
            .unwrap_or(0)
            + 1
    }
}

/// Idea storage kept in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdeaStorage {
    state: Arc<RwLock<IdeaState>>,
}

impl InMemoryIdeaStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdeaStorage for InMemoryIdeaStorage {
    async fn get_all(&self, tenant_id: i32) -> StorageResult<Vec<Idea>> {
        let state = self.state.read().await;
        let mut ideas: Vec<Idea> = state
            .records
            .iter()
            .filter(|r| r.tenant_id == tenant_id)
            .map(IdeaRecord::snapshot)
            .collect();
        ideas.sort_by_key(|idea| idea.number);
        Ok(ideas)
    }

    async fn get_by_id(&self, tenant_id: i32, id: i32) -> StorageResult<Idea> {
        let state = self.state.read().await;
        state
            .records
            .iter()
            .find(|r| r.tenant_id == tenant_id && r.idea.id == id)
            .map(IdeaRecord::snapshot)
            .ok_or_else(StorageError::idea_not_found)
    }

    async fn get_by_number(&self, tenant_id: i32, number: i32) -> StorageResult<Idea> {
        let state = self.state.read().await;
        state.find(tenant_id, number).map(IdeaRecord::snapshot)
    }

    async fn save(
        &self,
        tenant_id: i32,
        user_id: i32,
        title: &str,
        description: &str,
    ) -> StorageResult<Idea> {
        let mut state = self.state.write().await;
        state.last_idea_id += 1;

        let record = IdeaRecord {
            tenant_id,
            idea: Idea {
                id: state.last_idea_id,
                number: state.next_number(tenant_id),
                title: title.to_string(),
                description: description.to_string(),
                created_on: Utc::now(),
                user_id,
                total_supporters: 1,
            },
            supporters: BTreeSet::from([user_id]),
            comments: Vec::new(),
        };
        let idea = record.snapshot();
        state.records.push(record);

        Ok(idea)
    }

    async fn add_comment(
        &self,
        tenant_id: i32,
        user_id: i32,
        number: i32,
        content: &str,
    ) -> StorageResult<Comment> {
        let mut state = self.state.write().await;
        // check existence before consuming a comment id
        state.find(tenant_id, number)?;
        state.last_comment_id += 1;

        let comment = Comment {
            id: state.last_comment_id,
            content: content.to_string(),
            created_on: Utc::now(),
            user_id,
        };
        state
            .find_mut(tenant_id, number)?
            .comments
            .push(comment.clone());

        Ok(comment)
    }

    async fn get_comments(&self, tenant_id: i32, number: i32) -> StorageResult<Vec<Comment>> {
        let state = self.state.read().await;
        Ok(state.find(tenant_id, number)?.comments.clone())
    }

    async fn add_supporter(
        &self,
        tenant_id: i32,
        user_id: i32,
        number: i32,
    ) -> StorageResult<Idea> {
        let mut state = self.state.write().await;
        let record = state.find_mut(tenant_id, number)?;
        record.supporters.insert(user_id);
        Ok(record.snapshot())
    }

    async fn remove_supporter(
        &self,
        tenant_id: i32,
        user_id: i32,
        number: i32,
    ) -> StorageResult<Idea> {
        let mut state = self.state.write().await;
        let record = state.find_mut(tenant_id, number)?;
        record.supporters.remove(&user_id);
        Ok(record.snapshot())
    }
}

/// Tenant registry kept in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantStorage {
    tenants: Arc<RwLock<Vec<Tenant>>>,
}

impl InMemoryTenantStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TenantStorage for InMemoryTenantStorage {
    async fn get_by_domain(&self, domain: &str) -> StorageResult<Tenant> {
        let tenants = self.tenants.read().await;
        tenants
            .iter()
            .find(|t| t.domain.eq_ignore_ascii_case(domain))
            .cloned()
            .ok_or_else(StorageError::tenant_not_found)
    }

    async fn add(&self, name: &str, domain: &str) -> StorageResult<Tenant> {
        let mut tenants = self.tenants.write().await;
        if tenants.iter().any(|t| t.domain.eq_ignore_ascii_case(domain)) {
            return Err(StorageError::Conflict(format!(
                "Domain '{}' is already taken",
                domain
            )));
        }

        let tenant = Tenant::new(tenants.len() as i32 + 1, name, domain.to_lowercase());
        tenants.push(tenant.clone());
        Ok(tenant)
    }
}
