pub mod app_state;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod mock;
pub mod models;
pub mod router;
pub mod startup;
pub mod storage;

pub use app_state::AppState;
pub use config::Config;
pub use error::ApiError;
