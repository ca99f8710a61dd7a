//! Routes host events to button actions.
//!
//! # Responsibilities
//! - Map action UUIDs to handlers
//! - Bind and unbind controls as they appear and disappear
//! - Run activations as their own tasks and alert on failure
//! - Apply global settings pushed by the host
//!
//! # Design Decisions
//! - Unknown action UUIDs are logged and ignored, never fatal
//! - A failed activation produces exactly one alert and no retry

use std::sync::Arc;

use serde_json::Value;

use crate::actions::{legacy, playlist_play, playlist_playback, soundboard_play, ActionError, ActionKind};
use crate::assets::ImageKey;
use crate::config::{GlobalSettings, RemoteConfig};
use crate::host::{ActionEvent, ControlId, EventKind, HostEvent, Outbox, Settings};
use crate::observability::metrics;
use crate::remote::RemoteClient;
use crate::sync::Reconciler;

pub struct ActionRegistry {
    client: RemoteClient,
    reconciler: Arc<Reconciler>,
    outbox: Outbox,
    /// Server the plugin falls back to, and persists when the host has no
    /// global settings yet.
    defaults: RemoteConfig,
}

impl ActionRegistry {
    pub fn new(client: RemoteClient, reconciler: Arc<Reconciler>, outbox: Outbox, defaults: RemoteConfig) -> Self {
        Self {
            client,
            reconciler,
            outbox,
            defaults,
        }
    }

    /// Handle one decoded host event. Activations are spawned so a slow
    /// server never blocks the host read loop.
    pub fn dispatch(self: &Arc<Self>, event: HostEvent) {
        let event = match event {
            HostEvent::Action(event) => event,
            HostEvent::GlobalSettings(settings) => {
                self.on_global_settings(settings);
                return;
            }
            HostEvent::Ignored => return,
        };

        let Some(kind) = ActionKind::from_uuid(&event.action) else {
            tracing::debug!(action = %event.action, control = %event.control, "Ignoring event for unknown action");
            return;
        };

        let ActionEvent {
            kind: event_kind,
            control,
            settings,
            ..
        } = event;

        match event_kind {
            EventKind::Show => self.on_show(kind, &control, &settings),
            EventKind::Hide => self.on_hide(kind, &control),
            EventKind::SettingsChanged => self.on_settings_changed(kind, &control, &settings),
            EventKind::Activate => {
                let registry = Arc::clone(self);
                tokio::spawn(async move {
                    let _ = registry.activate(kind, control, settings).await;
                });
            }
            EventKind::Deactivate => {}
            EventKind::TitleChanged { title } => self.on_title_changed(kind, &control, &settings, title),
        }
    }

    /// Run a button press. On failure the control shows an alert once and
    /// the error is returned for the caller's information.
    pub async fn activate(&self, kind: ActionKind, control: ControlId, settings: Settings) -> Result<(), ActionError> {
        let result = match kind {
            ActionKind::PlaylistPlay => playlist_play::activate(&self.client, &settings).await,
            ActionKind::SoundboardPlay => {
                soundboard_play::activate(&self.client, &self.reconciler, &control, &settings).await
            }
            ActionKind::PlaylistPlayback => {
                playlist_playback::activate(&self.client, &self.reconciler, &settings).await
            }
            ActionKind::LegacyPlay => legacy::activate_play(&self.client, &self.defaults, &settings).await,
            ActionKind::LegacyPlayback => legacy::activate_playback(&self.client, &self.defaults, &settings).await,
        };

        metrics::record_action(kind.label(), result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(action = kind.label(), control = %control, error = %e, "Action failed");
            self.outbox.show_alert(&control);
        }
        result
    }

    /// A control became visible. Controls without settings ask the host for
    /// them first; binding happens when they arrive.
    pub fn on_show(&self, kind: ActionKind, control: &ControlId, settings: &Settings) {
        if settings.is_empty() {
            self.outbox.request_settings(control);
            return;
        }
        self.bind(kind, control, settings);
    }

    pub fn on_settings_changed(&self, kind: ActionKind, control: &ControlId, settings: &Settings) {
        self.bind(kind, control, settings);
    }

    pub fn on_hide(&self, kind: ActionKind, control: &ControlId) {
        match kind {
            ActionKind::SoundboardPlay | ActionKind::PlaylistPlayback => {
                self.reconciler.unbind(control);
            }
            ActionKind::LegacyPlayback => self.outbox.set_image(control, ImageKey::Blank),
            ActionKind::PlaylistPlay | ActionKind::LegacyPlay => {}
        }
    }

    pub fn on_title_changed(&self, kind: ActionKind, control: &ControlId, settings: &Settings, title: String) {
        if kind == ActionKind::LegacyPlay {
            legacy::store_title(&self.outbox, control, settings, title);
        }
    }

    /// Swap the remote endpoint, or seed the host with the configured
    /// defaults when it has nothing stored.
    pub fn on_global_settings(&self, settings: Settings) {
        let settings: GlobalSettings = match serde_json::from_value(Value::Object(settings)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring invalid global settings");
                return;
            }
        };

        if settings.is_empty() {
            let defaults = GlobalSettings::from_remote(&self.defaults);
            match serde_json::to_value(&defaults) {
                Ok(payload) => {
                    tracing::info!(address = %self.defaults.address, port = self.defaults.port, "Storing default global settings");
                    self.outbox.persist_global_settings(payload);
                }
                Err(e) => tracing::error!(error = %e, "Failed to encode default global settings"),
            }
            return;
        }

        let current = self.client.endpoint();
        let next = settings.apply_to(&current);
        if next != *current {
            self.client.set_endpoint(next);
        }
    }

    fn bind(&self, kind: ActionKind, control: &ControlId, settings: &Settings) {
        let result = match kind {
            ActionKind::SoundboardPlay => soundboard_play::bind(&self.reconciler, control, settings),
            ActionKind::PlaylistPlayback => playlist_playback::bind(&self.reconciler, control, settings),
            ActionKind::LegacyPlayback => legacy::paint_playback(&self.outbox, control, settings),
            ActionKind::PlaylistPlay | ActionKind::LegacyPlay => Ok(()),
        };

        if let Err(e) = result {
            tracing::debug!(action = kind.label(), control = %control, error = %e, "Control not bound");
            self.reconciler.unbind(control);
        }
    }
}
