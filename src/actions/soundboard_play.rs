//! Soundboard toggle: start the bound sound, or stop it while it plays.

use serde::Deserialize;

use crate::actions::{parse_settings, ActionError};
use crate::host::{ControlId, Settings};
use crate::remote::{RemoteClient, SoundId};
use crate::sync::Reconciler;

#[derive(Debug, Default, Deserialize)]
struct SoundSettings {
    #[serde(default)]
    id: Option<SoundId>,
}

fn sound_id(settings: &Settings) -> Result<SoundId, ActionError> {
    let settings: SoundSettings = parse_settings(settings)?;
    settings.id.ok_or(ActionError::MissingSetting("id"))
}

/// Register the control so polls keep its image in sync.
pub fn bind(reconciler: &Reconciler, control: &ControlId, settings: &Settings) -> Result<(), ActionError> {
    let sound_id = sound_id(settings)?;
    reconciler.bind_sound(control.clone(), sound_id);
    Ok(())
}

pub async fn activate(
    client: &RemoteClient,
    reconciler: &Reconciler,
    control: &ControlId,
    settings: &Settings,
) -> Result<(), ActionError> {
    let sound_id = sound_id(settings)?;
    let playing = reconciler.is_sound_playing(&sound_id);

    if playing {
        client.stop_sound(&sound_id).await?;
    } else {
        client.play_sound(&sound_id).await?;
    }

    reconciler.commit_sound(control, &sound_id, !playing);
    Ok(())
}
