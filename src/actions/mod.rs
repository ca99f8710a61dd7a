//! Button actions.
//!
//! # Data Flow
//! ```text
//! HostEvent
//!     → registry.rs (route by action UUID and event kind)
//!     → playlist_play.rs / soundboard_play.rs / playlist_playback.rs / legacy.rs
//!     → remote client (direct, never through the breaker)
//!     → reconciler commit_* on success, showAlert on failure
//! ```
//!
//! # Design Decisions
//! - Presses bypass the circuit breaker: the user always gets a real attempt
//!   and an alert if it fails
//! - Local state is only touched after the server accepted the request

pub mod legacy;
pub mod playlist_play;
pub mod playlist_playback;
pub mod registry;
pub mod soundboard_play;

pub use registry::ActionRegistry;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::host::Settings;
use crate::remote::RequestError;

/// Why a button press failed.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("action not implemented: {0}")]
    NotImplemented(String),

    #[error("missing setting: {0}")]
    MissingSetting(&'static str),

    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),
}

/// The action types this plugin registers with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    PlaylistPlay,
    SoundboardPlay,
    PlaylistPlayback,
    /// Play a URL on an older server.
    LegacyPlay,
    /// Transport buttons for an older server.
    LegacyPlayback,
}

impl ActionKind {
    pub const ALL: [ActionKind; 5] = [
        ActionKind::PlaylistPlay,
        ActionKind::SoundboardPlay,
        ActionKind::PlaylistPlayback,
        ActionKind::LegacyPlay,
        ActionKind::LegacyPlayback,
    ];

    pub fn uuid(self) -> &'static str {
        match self {
            ActionKind::PlaylistPlay => "fm.kenku.remote.playlist-play",
            ActionKind::SoundboardPlay => "fm.kenku.remote.soundboard-play",
            ActionKind::PlaylistPlayback => "fm.kenku.remote.playlist-playback",
            ActionKind::LegacyPlay => "fm.kenku.remote.play",
            ActionKind::LegacyPlayback => "fm.kenku.remote.playback",
        }
    }

    pub fn from_uuid(uuid: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.uuid() == uuid)
    }

    /// Short name used in logs and metric labels.
    pub fn label(self) -> &'static str {
        match self {
            ActionKind::PlaylistPlay => "playlist_play",
            ActionKind::SoundboardPlay => "soundboard_play",
            ActionKind::PlaylistPlayback => "playlist_playback",
            ActionKind::LegacyPlay => "legacy_play",
            ActionKind::LegacyPlayback => "legacy_playback",
        }
    }
}

/// Decode a control's settings into an action's typed view.
pub(crate) fn parse_settings<T: DeserializeOwned>(settings: &Settings) -> Result<T, ActionError> {
    Ok(serde_json::from_value(Value::Object(settings.clone()))?)
}
