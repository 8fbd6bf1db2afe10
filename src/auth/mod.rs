use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

pub mod jwt;
pub mod middleware;

pub const TOKEN_ISSUER: &str = "feedback-api";

/// User claims for JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: i32,      // Subject (user ID)
    pub name: String,  // Display name
    pub email: String, // Email, may be empty
    pub exp: i64,      // Expiration time
    pub iat: i64,      // Issued at
    pub iss: String,   // Issuer
}

impl Claims {
    pub fn new(user: &User, lifetime_secs: i64) -> Self {
        let now = Utc::now();
        let exp = now + chrono::Duration::seconds(lifetime_secs);

        Self {
            sub: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: TOKEN_ISSUER.to_string(),
        }
    }

    pub fn user(&self) -> User {
        User::new(self.sub, self.name.clone()).with_email(self.email.clone())
    }
}
