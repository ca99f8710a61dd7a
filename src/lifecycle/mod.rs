//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Build client, breaker, reconciler, registry
//!     → connect to the panel host (with backoff) → register
//!     → start the poller → request global settings → run the session
//!
//! Shutdown (shutdown.rs):
//!     Host closes socket / signal → broadcast → poller and session exit
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Failing to reach the panel host is the only fatal startup error
//! - The plugin has no life of its own once the host goes away

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{run_plugin, StartupError};
