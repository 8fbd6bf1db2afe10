//! Storage abstractions for tenant-scoped data.
//!
//! This module provides:
//! - `IdeaStorage` and `TenantStorage` traits handlers depend on
//! - In-memory implementations used by tests and database-less runs
//! - PostgreSQL implementations backed by `sqlx`

use thiserror::Error;

pub mod ideas;
pub mod memory;
pub mod postgres;
pub mod tenants;

pub use ideas::IdeaStorage;
pub use memory::{InMemoryIdeaStorage, InMemoryTenantStorage};
pub use postgres::{PostgresIdeaStorage, PostgresTenantStorage};
pub use tenants::TenantStorage;

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    pub fn idea_not_found() -> Self {
        StorageError::NotFound("Idea".to_string())
    }

    pub fn tenant_not_found() -> Self {
        StorageError::NotFound("Tenant".to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}
