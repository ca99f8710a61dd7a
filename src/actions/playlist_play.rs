//! Start a playlist or a single track.

use serde::Deserialize;

use crate::actions::{parse_settings, ActionError};
use crate::host::Settings;
use crate::remote::RemoteClient;

#[derive(Debug, Default, Deserialize)]
struct PlaylistPlaySettings {
    #[serde(default)]
    id: Option<String>,
}

pub async fn activate(client: &RemoteClient, settings: &Settings) -> Result<(), ActionError> {
    let settings: PlaylistPlaySettings = parse_settings(settings)?;
    let id = settings.id.ok_or(ActionError::MissingSetting("id"))?;
    client.play_playlist(&id).await?;
    Ok(())
}
