//! Transport actions for playlist playback buttons.

use std::fmt;
use std::str::FromStr;

use crate::assets::ImageKey;
use crate::remote::PlaylistState;

/// What a playlist playback button does, from its `action` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportAction {
    PlayPause,
    IncreaseVolume,
    DecreaseVolume,
    Mute,
    Next,
    Previous,
    Shuffle,
    Repeat,
}

impl TransportAction {
    pub fn label(self) -> &'static str {
        match self {
            TransportAction::PlayPause => "play-pause",
            TransportAction::IncreaseVolume => "increase-volume",
            TransportAction::DecreaseVolume => "decrease-volume",
            TransportAction::Mute => "mute",
            TransportAction::Next => "next",
            TransportAction::Previous => "previous",
            TransportAction::Shuffle => "shuffle",
            TransportAction::Repeat => "repeat",
        }
    }

    /// Image for this button given the playback state.
    pub fn image(self, state: &PlaylistState) -> ImageKey {
        match self {
            TransportAction::PlayPause if state.playing => ImageKey::Pause,
            TransportAction::PlayPause => ImageKey::Play,
            TransportAction::Mute if state.muted => ImageKey::MuteOn,
            TransportAction::Mute => ImageKey::MuteOff,
            TransportAction::Shuffle if state.shuffle => ImageKey::ShuffleOn,
            TransportAction::Shuffle => ImageKey::ShuffleOff,
            TransportAction::Repeat => ImageKey::Repeat(state.repeat),
            TransportAction::IncreaseVolume => ImageKey::VolumeUp,
            TransportAction::DecreaseVolume => ImageKey::VolumeDown,
            TransportAction::Next => ImageKey::Next,
            TransportAction::Previous => ImageKey::Previous,
        }
    }
}

impl fmt::Display for TransportAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An `action` setting no button implements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTransport(pub String);

impl FromStr for TransportAction {
    type Err = UnknownTransport;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label {
            "play-pause" => Ok(TransportAction::PlayPause),
            "increase-volume" => Ok(TransportAction::IncreaseVolume),
            "decrease-volume" => Ok(TransportAction::DecreaseVolume),
            "mute" => Ok(TransportAction::Mute),
            "next" => Ok(TransportAction::Next),
            "previous" => Ok(TransportAction::Previous),
            "shuffle" => Ok(TransportAction::Shuffle),
            "repeat" => Ok(TransportAction::Repeat),
            other => Err(UnknownTransport(other.to_string())),
        }
    }
}
