//! Actions for older playback servers.
//!
//! These buttons carry their own `address`/`port` in settings and talk to
//! the unversioned API: `POST /play` and `POST /playback/{action}`. They are
//! not reconciled; their images are static.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::{parse_settings, ActionError};
use crate::assets::ImageKey;
use crate::config::settings::port_from_any;
use crate::config::RemoteConfig;
use crate::host::{ControlId, Outbox, Settings};
use crate::remote::{RemoteClient, RemoteEndpoint};

#[derive(Debug, Default, Deserialize)]
struct LegacyTarget {
    #[serde(default)]
    address: Option<String>,
    #[serde(default, deserialize_with = "port_from_any")]
    port: Option<u16>,
}

impl LegacyTarget {
    /// Unversioned endpoint; unset fields fall back to the configured server.
    fn endpoint(&self, defaults: &RemoteConfig) -> RemoteEndpoint {
        let address = self
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(&defaults.address);
        RemoteEndpoint::new(address, self.port.unwrap_or(defaults.port), None)
    }
}

#[derive(Debug, Default, Deserialize)]
struct PlaySettings {
    #[serde(flatten)]
    target: LegacyTarget,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "loop")]
    looping: bool,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Serialize)]
struct PlayRequest<'a> {
    url: &'a str,
    #[serde(rename = "loop")]
    looping: bool,
    title: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct PlaybackSettings {
    #[serde(flatten)]
    target: LegacyTarget,
    #[serde(default)]
    action: Option<String>,
}

/// `fm.kenku.remote.play`: play the configured URL.
pub async fn activate_play(
    client: &RemoteClient,
    defaults: &RemoteConfig,
    settings: &Settings,
) -> Result<(), ActionError> {
    let settings: PlaySettings = parse_settings(settings)?;
    let url = settings.url.as_deref().ok_or(ActionError::MissingSetting("url"))?;
    let body = PlayRequest {
        url,
        looping: settings.looping,
        title: settings.title.as_deref().unwrap_or_default(),
    };

    let endpoint = settings.target.endpoint(defaults);
    client
        .call_at(&endpoint, "play", Method::POST, Some(serde_json::to_value(&body)?))
        .await?;
    Ok(())
}

/// `fm.kenku.remote.playback`: forward the button's action verbatim.
pub async fn activate_playback(
    client: &RemoteClient,
    defaults: &RemoteConfig,
    settings: &Settings,
) -> Result<(), ActionError> {
    let settings: PlaybackSettings = parse_settings(settings)?;
    let action = settings.action.as_deref().ok_or(ActionError::MissingSetting("action"))?;

    let endpoint = settings.target.endpoint(defaults);
    client
        .call_at(&endpoint, &format!("playback/{}", action), Method::POST, None)
        .await?;
    Ok(())
}

fn playback_image(action: &str) -> Option<ImageKey> {
    match action {
        "play-pause" => Some(ImageKey::PlayPause),
        "mute" => Some(ImageKey::Mute),
        "increase-volume" => Some(ImageKey::VolumeUp),
        "decrease-volume" => Some(ImageKey::VolumeDown),
        _ => None,
    }
}

/// Paint a legacy transport button from its settings.
pub fn paint_playback(outbox: &Outbox, control: &ControlId, settings: &Settings) -> Result<(), ActionError> {
    let settings: PlaybackSettings = parse_settings(settings)?;
    if let Some(image) = settings.action.as_deref().and_then(playback_image) {
        outbox.set_image(control, image);
    }
    Ok(())
}

/// Store an edited title in the control's settings so the next press sends
/// it. Ignored until the control has settings.
pub fn store_title(outbox: &Outbox, control: &ControlId, settings: &Settings, title: String) {
    if settings.is_empty() {
        return;
    }
    let mut merged = settings.clone();
    merged.insert("title".to_string(), Value::String(title));
    outbox.persist_settings(control, Value::Object(merged));
}
