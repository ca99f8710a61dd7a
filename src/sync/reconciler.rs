//! Reconciles polled server state with what the buttons show.
//!
//! # Responsibilities
//! - Hold the local mirror of playlist playback state
//! - Own the control binding registry
//! - Diff each snapshot and queue only the image updates that changed
//! - Apply optimistic updates after successful button presses
//!
//! # Design Decisions
//! - Every public operation takes the panel lock once, mutates, queues its
//!   image updates and releases; nothing awaits while the lock is held
//! - Diffs are against per-control flags, so a sound that stops reverts its
//!   button once and then stays quiet
//! - An optimistic update followed by a poll that agrees emits nothing

use std::sync::{Mutex, MutexGuard};

use crate::assets::ImageKey;
use crate::host::{ControlId, Outbox};
use crate::observability::metrics;
use crate::remote::{PlaybackSnapshot, PlaylistState, SoundId};
use crate::sync::bindings::{ControlBinding, ControlBindings};
use crate::sync::transport::TransportAction;

#[derive(Debug, Default)]
struct PanelState {
    playback: PlaylistState,
    bindings: ControlBindings,
    baseline: Option<PlaybackSnapshot>,
}

impl PanelState {
    fn repaint_transports(&self, outbox: &Outbox) -> usize {
        let mut emitted = 0;
        for (control, action) in self.bindings.transports() {
            outbox.set_image(control, action.image(&self.playback));
            emitted += 1;
        }
        emitted
    }
}

/// Local playback state and control bindings.
#[derive(Debug)]
pub struct Reconciler {
    panel: Mutex<PanelState>,
    outbox: Outbox,
}

impl Reconciler {
    pub fn new(outbox: Outbox) -> Self {
        Self {
            panel: Mutex::new(PanelState::default()),
            outbox,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PanelState> {
        self.panel.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reconcile a freshly polled snapshot. Returns the number of image
    /// updates queued.
    pub fn apply(&self, snapshot: PlaybackSnapshot) -> usize {
        let mut panel = self.lock();
        let mut emitted = 0;

        for (control, sound_id, playing) in panel.bindings.sounds_mut() {
            let now_playing = snapshot.soundboard.is_playing(sound_id);
            if now_playing != *playing {
                tracing::debug!(control = %control, sound = %sound_id, playing = now_playing, "Sound changed remotely");
                *playing = now_playing;
                self.outbox.set_image(control, ImageKey::sound(now_playing));
                emitted += 1;
            }
        }

        if panel.playback != snapshot.playlist {
            tracing::debug!(previous = ?panel.playback, current = ?snapshot.playlist, "Playlist playback changed");
            panel.playback = snapshot.playlist.clone();
            emitted += panel.repaint_transports(&self.outbox);
        }

        panel.baseline = Some(snapshot);
        metrics::record_display_updates(emitted);
        emitted
    }

    /// Bind a soundboard control and paint it from the last snapshot.
    ///
    /// Rebinding a control to the sound it already shows keeps its flag, so a
    /// press committed since the last poll is not lost.
    pub fn bind_sound(&self, control: ControlId, sound_id: SoundId) {
        let mut panel = self.lock();
        let playing = match panel.bindings.get(&control) {
            Some(ControlBinding::Sound { sound_id: bound, playing }) if *bound == sound_id => *playing,
            _ => panel
                .baseline
                .as_ref()
                .is_some_and(|snapshot| snapshot.soundboard.is_playing(&sound_id)),
        };

        self.outbox.set_image(&control, ImageKey::sound(playing));
        tracing::debug!(control = %control, sound = %sound_id, playing, "Sound control bound");
        panel
            .bindings
            .insert(control, ControlBinding::Sound { sound_id, playing });
    }

    /// Bind a playlist playback control and paint it from the local state.
    pub fn bind_transport(&self, control: ControlId, action: TransportAction) {
        let mut panel = self.lock();
        self.outbox.set_image(&control, action.image(&panel.playback));
        tracing::debug!(control = %control, action = %action, "Transport control bound");
        panel.bindings.insert(control, ControlBinding::Transport(action));
    }

    /// Forget a control. Transport controls are blanked so a reused slot
    /// never shows stale state.
    pub fn unbind(&self, control: &ControlId) -> Option<ControlBinding> {
        let mut panel = self.lock();
        let removed = panel.bindings.remove(control);
        if let Some(ControlBinding::Transport(_)) = removed {
            self.outbox.set_image(control, ImageKey::Blank);
        }
        removed
    }

    /// Copy of the local playlist playback state.
    pub fn playback(&self) -> PlaylistState {
        self.lock().playback.clone()
    }

    pub fn binding(&self, control: &ControlId) -> Option<ControlBinding> {
        self.lock().bindings.get(control).cloned()
    }

    pub fn binding_count(&self) -> usize {
        self.lock().bindings.len()
    }

    /// Whether any control shows `sound_id` as playing.
    pub fn is_sound_playing(&self, sound_id: &SoundId) -> bool {
        self.lock().bindings.is_sound_playing(sound_id)
    }

    /// Record that `sound_id` was started or stopped from `control`.
    ///
    /// Every control bound to that sound is updated; `control` is painted
    /// even when it is not bound.
    pub fn commit_sound(&self, control: &ControlId, sound_id: &SoundId, playing: bool) -> usize {
        let mut panel = self.lock();
        let mut emitted = 0;
        let mut control_bound = false;

        for (bound, id, flag) in panel.bindings.sounds_mut() {
            if id != sound_id {
                continue;
            }
            control_bound |= bound == control;
            if *flag != playing {
                *flag = playing;
                self.outbox.set_image(bound, ImageKey::sound(playing));
                emitted += 1;
            }
        }

        if !control_bound {
            self.outbox.set_image(control, ImageKey::sound(playing));
            emitted += 1;
        }
        metrics::record_display_updates(emitted);
        emitted
    }

    /// Apply an optimistic change to the local playback state and repaint
    /// every transport control if anything changed.
    pub fn commit_playback(&self, change: impl FnOnce(&mut PlaylistState)) -> usize {
        let mut panel = self.lock();
        let mut next = panel.playback.clone();
        change(&mut next);
        if next == panel.playback {
            return 0;
        }

        panel.playback = next;
        let emitted = panel.repaint_transports(&self.outbox);
        metrics::record_display_updates(emitted);
        emitted
    }
}
