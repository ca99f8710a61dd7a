//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events to stderr)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Panel host log capture
//!     → Optional Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - Polling failures log at debug only; a closed server is a normal state
//! - Metrics exporter is off by default

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
