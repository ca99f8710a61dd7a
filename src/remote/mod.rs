//! Remote playback server subsystem.
//!
//! # Data Flow
//! ```text
//! Poller (via circuit breaker) ─┐
//!                               ├→ client.rs → HTTP/JSON → playback server
//! Button actions (direct) ──────┘
//! ```
//!
//! # Design Decisions
//! - One client shared by the poller and every action
//! - Typed helpers per endpoint; `call` stays available for raw access
//! - Errors distinguish "server absent" from "server said no"

pub mod client;
pub mod types;

pub use client::RemoteClient;
pub use types::{
    PlaybackSnapshot, PlaylistState, RemoteEndpoint, Repeat, RequestError, SoundId,
    SoundboardState,
};
