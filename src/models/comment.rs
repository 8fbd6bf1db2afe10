use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A comment left on an idea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub created_on: DateTime<Utc>,
    pub user_id: i32,
}

/// Request to comment on an idea
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewCommentRequest {
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
}

impl NewCommentRequest {
    pub fn normalized(self) -> Self {
        Self {
            content: self.content.trim().to_string(),
        }
    }
}
