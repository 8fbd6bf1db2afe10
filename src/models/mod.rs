// Data models and DTOs
// Tenant-scoped records and API request/response models

pub mod comment;
pub mod idea;
pub mod tenant;
pub mod user;

pub use comment::{Comment, NewCommentRequest};
pub use idea::{Idea, IdeaDetails, NewIdeaRequest};
pub use tenant::Tenant;
pub use user::User;
