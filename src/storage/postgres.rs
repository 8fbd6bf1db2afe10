//! PostgreSQL storage backends.
//!
//! Schema lives in `migrations/`. Idea numbers are allocated under a
//! per-tenant advisory lock so concurrent saves never collide on
//! `(tenant_id, number)`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{IdeaStorage, StorageError, StorageResult, TenantStorage};
use crate::models::{Comment, Idea, Tenant};

const IDEA_SELECT: &str = r#"
    SELECT i.id, i.number, i.title, i.description, i.created_on, i.user_id,
           (SELECT COUNT(*) FROM idea_supporters s WHERE s.idea_id = i.id)::INT4 AS total_supporters
    FROM ideas i
"#;

/// Idea storage backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PostgresIdeaStorage {
    db: PgPool,
}

impl PostgresIdeaStorage {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn idea_id_for_number(&self, tenant_id: i32, number: i32) -> StorageResult<i32> {
        sqlx::query_scalar::<_, i32>("SELECT id FROM ideas WHERE tenant_id = $1 AND number = $2")
            .bind(tenant_id)
            .bind(number)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(StorageError::idea_not_found)
    }
}

#[async_trait]
impl IdeaStorage for PostgresIdeaStorage {
    async fn get_all(&self, tenant_id: i32) -> StorageResult<Vec<Idea>> {
        let query = format!("{} WHERE i.tenant_id = $1 ORDER BY i.number", IDEA_SELECT);
        let ideas = sqlx::query_as::<_, Idea>(&query)
            .bind(tenant_id)
            .fetch_all(&self.db)
            .await?;
        Ok(ideas)
    }

    async fn get_by_id(&self, tenant_id: i32, id: i32) -> StorageResult<Idea> {
        let query = format!("{} WHERE i.tenant_id = $1 AND i.id = $2", IDEA_SELECT);
        sqlx::query_as::<_, Idea>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(StorageError::idea_not_found)
    }

    async fn get_by_number(&self, tenant_id: i32, number: i32) -> StorageResult<Idea> {
        let query = format!("{} WHERE i.tenant_id = $1 AND i.number = $2", IDEA_SELECT);
        sqlx::query_as::<_, Idea>(&query)
            .bind(tenant_id)
            .bind(number)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(StorageError::idea_not_found)
    }

    async fn save(
        &self,
        tenant_id: i32,
        user_id: i32,
        title: &str,
        description: &str,
    ) -> StorageResult<Idea> {
        let mut tx = self.db.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1::INT8)")
            .bind(tenant_id)
            .execute(&mut *tx)
            .await?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO ideas (tenant_id, number, title, description, user_id, created_on)
            VALUES ($1,
                    (SELECT COALESCE(MAX(number), 0) + 1 FROM ideas WHERE tenant_id = $1),
                    $2, $3, $4, NOW())
            RETURNING id
            "#,
        )
        .bind(tenant_id)
        .bind(title)
        .bind(description)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StorageError::Conflict("Idea number already allocated".to_string())
            }
            other => StorageError::Database(other),
        })?;

        sqlx::query("INSERT INTO idea_supporters (idea_id, user_id) VALUES ($1, $2)")
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let query = format!("{} WHERE i.id = $1", IDEA_SELECT);
        let idea = sqlx::query_as::<_, Idea>(&query)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(tenant_id, idea_id = idea.id, number = idea.number, "Idea stored");
        Ok(idea)
    }

    async fn add_comment(
        &self,
        tenant_id: i32,
        user_id: i32,
        number: i32,
        content: &str,
    ) -> StorageResult<Comment> {
        let idea_id = self.idea_id_for_number(tenant_id, number).await?;

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (idea_id, user_id, content, created_on)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, content, created_on, user_id
            "#,
        )
        .bind(idea_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(&self.db)
        .await?;

        Ok(comment)
    }

    async fn get_comments(&self, tenant_id: i32, number: i32) -> StorageResult<Vec<Comment>> {
        let idea_id = self.idea_id_for_number(tenant_id, number).await?;

        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, content, created_on, user_id
            FROM comments
            WHERE idea_id = $1
            ORDER BY created_on, id
            "#,
        )
        .bind(idea_id)
        .fetch_all(&self.db)
        .await?;

        Ok(comments)
    }

    async fn add_supporter(
        &self,
        tenant_id: i32,
        user_id: i32,
        number: i32,
    ) -> StorageResult<Idea> {
        let idea_id = self.idea_id_for_number(tenant_id, number).await?;

        sqlx::query(
            "INSERT INTO idea_supporters (idea_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(idea_id)
        .bind(user_id)
        .execute(&self.db)
        .await?;

        self.get_by_id(tenant_id, idea_id).await
    }

    async fn remove_supporter(
        &self,
        tenant_id: i32,
        user_id: i32,
        number: i32,
    ) -> StorageResult<Idea> {
        let idea_id = self.idea_id_for_number(tenant_id, number).await?;

        sqlx::query("DELETE FROM idea_supporters WHERE idea_id = $1 AND user_id = $2")
            .bind(idea_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        self.get_by_id(tenant_id, idea_id).await
    }
}

/// Tenant registry backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PostgresTenantStorage {
    db: PgPool,
}

impl PostgresTenantStorage {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TenantStorage for PostgresTenantStorage {
    async fn get_by_domain(&self, domain: &str) -> StorageResult<Tenant> {
        sqlx::query_as::<_, Tenant>("SELECT id, name, domain FROM tenants WHERE domain = LOWER($1)")
            .bind(domain)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(StorageError::tenant_not_found)
    }

    async fn add(&self, name: &str, domain: &str) -> StorageResult<Tenant> {
        sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (name, domain) VALUES ($1, LOWER($2)) RETURNING id, name, domain",
        )
        .bind(name)
        .bind(domain)
        .fetch_one(&self.db)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                StorageError::Conflict(format!("Domain '{}' is already taken", domain))
            }
            other => StorageError::Database(other),
        })
    }
}
