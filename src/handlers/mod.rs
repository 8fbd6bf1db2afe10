pub mod health;
pub mod ideas;
pub mod metrics;
pub mod response;

pub use response::ListResponse;
