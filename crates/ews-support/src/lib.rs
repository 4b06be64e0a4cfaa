//! # EWS Support
//!
//! Ambient scaffolding shared by the three EWS service binaries: layered
//! configuration loading, structured logging initialization, health-check
//! routes, and Prometheus metrics.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod metrics;

pub use config::{load, HttpConfig, LoggingConfig};
pub use error::ConfigError;
pub use health::{health_routes, ComponentHealth, HealthState, HealthStatus};
pub use logging::init_logging;
pub use metrics::{MetricsState, METRICS};
