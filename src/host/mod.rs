//! Panel host integration.
//!
//! # Data Flow
//! ```text
//! Host WebSocket frames
//!     → protocol.rs (decode into HostEvent)
//!     → actions::ActionRegistry (show / hide / settings / activate)
//!
//! Reconciler + actions
//!     → outbox.rs (ordered command queue)
//!     → connection.rs (resolve images, encode, write frames)
//! ```
//!
//! # Design Decisions
//! - Event names are mapped to an enum, never to handler names
//! - Producers never await the socket

pub mod connection;
pub mod outbox;
pub mod protocol;

pub use connection::{connect, HostError, HostIdentity, HostSession, HostStream};
pub use outbox::{Command, Outbox};
pub use protocol::{ActionEvent, ControlId, EventKind, HostEvent, Settings};
