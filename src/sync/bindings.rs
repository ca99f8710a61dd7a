//! Registry of what each visible control represents.
//!
//! A control is registered when it appears and removed when it disappears.
//! Keying by control id means a control is either bound exactly once or
//! absent.

use std::collections::HashMap;

use crate::host::ControlId;
use crate::remote::SoundId;
use crate::sync::transport::TransportAction;

/// What a visible control is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlBinding {
    /// A soundboard button and whether its sound is believed to be playing.
    Sound { sound_id: SoundId, playing: bool },
    /// A playlist playback button.
    Transport(TransportAction),
}

#[derive(Debug, Default)]
pub struct ControlBindings {
    entries: HashMap<ControlId, ControlBinding>,
}

impl ControlBindings {
    /// Bind `control`, replacing any previous binding.
    pub fn insert(&mut self, control: ControlId, binding: ControlBinding) -> Option<ControlBinding> {
        self.entries.insert(control, binding)
    }

    pub fn remove(&mut self, control: &ControlId) -> Option<ControlBinding> {
        self.entries.remove(control)
    }

    pub fn get(&self, control: &ControlId) -> Option<&ControlBinding> {
        self.entries.get(control)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Soundboard controls with their sound and playing flag.
    pub fn sounds_mut(&mut self) -> impl Iterator<Item = (&ControlId, &SoundId, &mut bool)> {
        self.entries.iter_mut().filter_map(|(control, binding)| match binding {
            ControlBinding::Sound { sound_id, playing } => Some((control, &*sound_id, playing)),
            ControlBinding::Transport(_) => None,
        })
    }

    /// Playlist playback controls.
    pub fn transports(&self) -> impl Iterator<Item = (&ControlId, TransportAction)> {
        self.entries.iter().filter_map(|(control, binding)| match binding {
            ControlBinding::Transport(action) => Some((control, *action)),
            ControlBinding::Sound { .. } => None,
        })
    }

    /// True when any control bound to `sound_id` shows it as playing.
    pub fn is_sound_playing(&self, sound_id: &SoundId) -> bool {
        self.entries.values().any(|binding| {
            matches!(binding, ControlBinding::Sound { sound_id: id, playing: true } if id == sound_id)
        })
    }
}
