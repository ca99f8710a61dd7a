//! Playlist transport buttons.
//!
//! The next value of a toggle is computed from the reconciler's local state
//! before the request. It is committed as an absolute value only once the
//! server accepted it, so a poll that already saw the change makes the
//! commit a no-op instead of a second toggle.

use serde::Deserialize;

use crate::actions::{parse_settings, ActionError};
use crate::host::{ControlId, Settings};
use crate::remote::RemoteClient;
use crate::sync::{Reconciler, TransportAction};

/// Volume change per press.
pub const VOLUME_STEP: f64 = 0.05;

#[derive(Debug, Default, Deserialize)]
struct PlaybackSettings {
    #[serde(default)]
    action: Option<String>,
}

fn transport(settings: &Settings) -> Result<TransportAction, ActionError> {
    let settings: PlaybackSettings = parse_settings(settings)?;
    let label = settings.action.ok_or(ActionError::MissingSetting("action"))?;
    label
        .parse()
        .map_err(|_| ActionError::NotImplemented(label))
}

/// Step `current` by `delta`, clamped to `[0, 1]` and rounded to hundredths.
pub fn step_volume(current: f64, delta: f64) -> f64 {
    let next = (current + delta).clamp(0.0, 1.0);
    (next * 100.0).round() / 100.0
}

pub fn bind(reconciler: &Reconciler, control: &ControlId, settings: &Settings) -> Result<(), ActionError> {
    let action = transport(settings)?;
    reconciler.bind_transport(control.clone(), action);
    Ok(())
}

pub async fn activate(
    client: &RemoteClient,
    reconciler: &Reconciler,
    settings: &Settings,
) -> Result<(), ActionError> {
    let action = transport(settings)?;
    let state = reconciler.playback();

    match action {
        TransportAction::PlayPause => {
            let playing = !state.playing;
            if playing {
                client.play().await?;
            } else {
                client.pause().await?;
            }
            reconciler.commit_playback(|s| s.playing = playing);
        }
        TransportAction::IncreaseVolume | TransportAction::DecreaseVolume => {
            let delta = if action == TransportAction::IncreaseVolume {
                VOLUME_STEP
            } else {
                -VOLUME_STEP
            };
            let volume = step_volume(state.volume, delta);
            client.set_volume(volume).await?;
            reconciler.commit_playback(|s| s.volume = volume);
        }
        TransportAction::Mute => {
            let muted = !state.muted;
            client.set_mute(muted).await?;
            reconciler.commit_playback(|s| s.muted = muted);
        }
        TransportAction::Shuffle => {
            let shuffle = !state.shuffle;
            client.set_shuffle(shuffle).await?;
            reconciler.commit_playback(|s| s.shuffle = shuffle);
        }
        TransportAction::Repeat => {
            let repeat = state.repeat.cycle();
            client.set_repeat(repeat).await?;
            reconciler.commit_playback(|s| s.repeat = repeat);
        }
        TransportAction::Next => client.next().await?,
        TransportAction::Previous => client.previous().await?,
    }

    tracing::debug!(action = %action, "Transport action applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(value: serde_json::Value) -> Settings {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_step_volume_clamps_and_rounds() {
        assert_eq!(step_volume(1.0, VOLUME_STEP), 1.0);
        assert_eq!(step_volume(0.02, -VOLUME_STEP), 0.0);
        assert_eq!(step_volume(0.1, 0.2), 0.3);
        assert_eq!(step_volume(0.55, -VOLUME_STEP), 0.5);
    }

    #[test]
    fn test_transport_from_settings() {
        assert_eq!(
            transport(&settings(json!({"action": "shuffle"}))).unwrap(),
            TransportAction::Shuffle
        );
        assert!(matches!(
            transport(&settings(json!({"action": "rewind"}))),
            Err(ActionError::NotImplemented(label)) if label == "rewind"
        ));
        assert!(matches!(
            transport(&settings(json!({}))),
            Err(ActionError::MissingSetting("action"))
        ));
    }
}
