use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// An isolated workspace; every idea and comment belongs to exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Tenant {
    pub id: i32,
    pub name: String,
    /// Host-name label the tenant is served under, e.g. `orange` for `orange.example.com`
    pub domain: String,
}

impl Tenant {
    pub fn new(id: i32, name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            domain: domain.into(),
        }
    }
}
