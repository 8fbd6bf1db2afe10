// Middleware module - tenant resolution, logging, metrics

pub mod metrics;
pub mod request_logger;
pub mod tenant;

pub use metrics::metrics_middleware;
pub use request_logger::request_logger_middleware;
pub use tenant::{tenant_middleware, CurrentTenant};
