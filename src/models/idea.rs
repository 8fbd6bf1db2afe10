//! Idea models
//!
//! An idea is numbered sequentially within its tenant; `id` is unique store-wide.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::comment::Comment;

/// A user-submitted suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Idea {
    pub id: i32,
    pub number: i32,
    pub title: String,
    pub description: String,
    pub created_on: DateTime<Utc>,
    /// Author of the idea
    pub user_id: i32,
    pub total_supporters: i32,
}

/// Idea together with its comments, returned by the details endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IdeaDetails {
    pub idea: Idea,
    pub comments: Vec<Comment>,
}

/// Request to post a new idea
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewIdeaRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be between 1 and 100 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl NewIdeaRequest {
    /// Trim surrounding whitespace so blank titles fail validation
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}
