//! Button images.
//!
//! Handlers and the reconciler only name an [`ImageKey`]. The host writer
//! resolves keys to `data:` URLs through the [`ImageCache`] right before
//! sending `setImage`, so no file I/O happens while panel state is locked.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dashmap::DashMap;

use crate::remote::Repeat;

/// Every image a button can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKey {
    Blank,
    SoundPlay,
    SoundStop,
    Play,
    Pause,
    MuteOn,
    MuteOff,
    VolumeUp,
    VolumeDown,
    Next,
    Previous,
    ShuffleOn,
    ShuffleOff,
    Repeat(Repeat),
    /// Legacy combined play/pause button.
    PlayPause,
    /// Legacy combined mute button.
    Mute,
}

impl ImageKey {
    /// Image for a soundboard button: stop while the sound plays.
    pub fn sound(playing: bool) -> Self {
        if playing {
            ImageKey::SoundStop
        } else {
            ImageKey::SoundPlay
        }
    }

    /// Asset file name, relative to the asset directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ImageKey::Blank => "blankImage.png",
            ImageKey::SoundPlay => "actionSoundboardPlayImage@2x.png",
            ImageKey::SoundStop => "actionSoundboardStopImage@2x.jpg",
            ImageKey::Play => "actionPlayImage@2x.jpg",
            ImageKey::Pause => "actionPauseImage@2x.jpg",
            ImageKey::MuteOn => "actionMuteOnImage@2x.jpg",
            ImageKey::MuteOff => "actionMuteOffImage@2x.jpg",
            ImageKey::VolumeUp => "actionIncreaseVolumeImage@2x.jpg",
            ImageKey::VolumeDown => "actionDecreaseVolumeImage@2x.jpg",
            ImageKey::Next => "actionNextImage@2x.jpg",
            ImageKey::Previous => "actionPreviousImage@2x.jpg",
            ImageKey::ShuffleOn => "actionShuffleOnImage@2x.jpg",
            ImageKey::ShuffleOff => "actionShuffleOffImage@2x.jpg",
            ImageKey::Repeat(Repeat::Off) => "actionRepeatOffImage@2x.jpg",
            ImageKey::Repeat(Repeat::Playlist) => "actionRepeatPlaylistImage@2x.jpg",
            ImageKey::Repeat(Repeat::Track) => "actionRepeatTrackImage@2x.jpg",
            ImageKey::PlayPause => "actionPlayPauseImage@2x.jpg",
            ImageKey::Mute => "actionMuteImage@2x.jpg",
        }
    }
}

/// Encodes asset files as `data:` URLs, once per image.
#[derive(Debug, Clone)]
pub struct ImageCache {
    directory: PathBuf,
    encoded: Arc<DashMap<ImageKey, Arc<str>>>,
}

impl ImageCache {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            encoded: Arc::new(DashMap::new()),
        }
    }

    /// The `data:` URL for `key`, reading the asset on first use.
    pub async fn data_url(&self, key: ImageKey) -> std::io::Result<Arc<str>> {
        if let Some(hit) = self.encoded.get(&key) {
            return Ok(hit.value().clone());
        }

        let path = self.directory.join(key.file_name());
        let bytes = tokio::fs::read(&path).await?;
        let url: Arc<str> = format!("data:{};base64,{}", mime_for(&path), STANDARD.encode(bytes)).into();

        self.encoded.insert(key, url.clone());
        tracing::trace!(image = key.file_name(), "Cached encoded image");
        Ok(url)
    }

    /// Number of images encoded so far.
    pub fn len(&self) -> usize {
        self.encoded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoded.is_empty()
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}
