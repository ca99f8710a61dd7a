//! Playback state synchronization.
//!
//! # Data Flow
//! ```text
//! poller.rs (interval tick)
//!     → circuit breaker → remote client (playlist + soundboard)
//!     → reconciler.rs (diff against bindings and local state)
//!     → host outbox (setImage per changed control)
//!
//! Button press (actions)
//!     → remote client (no breaker)
//!     → reconciler.rs commit_* (optimistic update)
//! ```

pub mod bindings;
pub mod poller;
pub mod reconciler;
pub mod transport;

pub use bindings::{ControlBinding, ControlBindings};
pub use poller::PlaybackPoller;
pub use reconciler::Reconciler;
pub use transport::{TransportAction, UnknownTransport};
