pub mod config;
pub mod error;
pub mod metrics;
pub mod service;
pub mod tracing;
pub mod validation;

pub use config::{Environment, ReviewConfig};
pub use error::ReviewError;
pub use service::ReviewService;
