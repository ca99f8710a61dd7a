//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Playback poll:
//!     → circuit_breaker.rs (fail fast while the server is known to be down)
//!     → remote client (single attempt, no retries)
//!
//! Panel host connection at startup:
//!     → backoff.rs (jittered delay between connection attempts)
//! ```
//!
//! # Design Decisions
//! - Only background polling goes through the breaker; button presses always
//!   reach the server so the user gets an honest alert
//! - No request retries: the next poll tick is the retry

pub mod backoff;
pub mod circuit_breaker;

pub use circuit_breaker::{BreakerError, BreakerSnapshot, BreakerState, CircuitBreaker};
