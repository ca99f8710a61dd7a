//! Remote playback server types and error definitions.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Identifier of a soundboard sound on the remote server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundId(pub String);

impl SoundId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SoundId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SoundId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Playlist repeat mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Repeat {
    #[default]
    Off,
    Playlist,
    Track,
}

impl Repeat {
    /// Next mode in the button cycle: off → playlist → track → off.
    pub fn cycle(self) -> Self {
        match self {
            Repeat::Off => Repeat::Playlist,
            Repeat::Playlist => Repeat::Track,
            Repeat::Track => Repeat::Off,
        }
    }
}

/// Playlist playback state as reported by `GET playlist/playback`.
///
/// Only the fields the buttons display are kept; track and playlist details
/// in the response are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistState {
    pub playing: bool,
    pub repeat: Repeat,
    pub shuffle: bool,
    pub muted: bool,
    pub volume: f64,
}

impl Default for PlaylistState {
    fn default() -> Self {
        Self {
            playing: false,
            repeat: Repeat::Off,
            shuffle: false,
            muted: false,
            volume: 1.0,
        }
    }
}

/// Sounds currently playing on the soundboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "SoundboardPlayback")]
pub struct SoundboardState {
    pub sounds: HashSet<SoundId>,
}

impl SoundboardState {
    pub fn is_playing(&self, id: &SoundId) -> bool {
        self.sounds.contains(id)
    }
}

impl<I: Into<SoundId>> FromIterator<I> for SoundboardState {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            sounds: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Wire shape of `GET soundboard/playback`.
#[derive(Debug, Deserialize)]
struct SoundboardPlayback {
    #[serde(default)]
    sounds: Vec<PlayingSound>,
}

#[derive(Debug, Deserialize)]
struct PlayingSound {
    id: SoundId,
}

impl From<SoundboardPlayback> for SoundboardState {
    fn from(wire: SoundboardPlayback) -> Self {
        wire.sounds.into_iter().map(|s| s.id).collect()
    }
}

/// Both halves of the remote playback state, fetched in one poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSnapshot {
    pub playlist: PlaylistState,
    pub soundboard: SoundboardState,
}

/// Where requests are sent.
///
/// `version` is the API path prefix; the legacy endpoints have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    pub address: String,
    pub port: u16,
    pub version: Option<String>,
}

impl RemoteEndpoint {
    pub fn new(address: impl Into<String>, port: u16, version: Option<&str>) -> Self {
        Self {
            address: address.into(),
            port,
            version: version.map(str::to_string),
        }
    }

    /// Build the request URL for `path`.
    pub fn url(&self, path: &str) -> Result<Url, RequestError> {
        let path = path.trim_start_matches('/');
        let raw = match &self.version {
            Some(version) => format!("http://{}:{}/{}/{}", self.address, self.port, version, path),
            None => format!("http://{}:{}/{}", self.address, self.port, path),
        };
        Ok(Url::parse(&raw)?)
    }
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Errors raised by a single request against the remote server.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Connection refused, DNS failure, timeout: the server is not reachable.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("remote responded {status}: {message}")]
    Response {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The response body was not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The endpoint does not form a valid URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl RequestError {
    /// True for failures where no HTTP response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, RequestError::Transport(_))
    }
}
