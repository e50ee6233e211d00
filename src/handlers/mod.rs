mod businesses;
mod health;
mod metrics;
mod rate_limits;

pub use businesses::{nearby_handler, nearest_handler, top_rated_handler};
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use rate_limits::{check_handler, reset_handler, reset_time_handler};
