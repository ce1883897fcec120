//! # Observability
//!
//! Structured logging and operational counters for the backend.
//!
//! - **Logger**: synchronous JSON-line logger, one event per line
//! - **Metrics**: monotonic counters, reset only on process start

pub mod logger;
pub mod metrics;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
