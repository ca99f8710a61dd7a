//! Panel host wire messages.
//!
//! Every frame is a JSON text message with an `event` discriminator.
//! Inbound messages are decoded into [`HostEvent`]s; outbound commands are
//! encoded from [`OutboundMessage`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `setImage` target: hardware and software.
pub const TARGET_HARDWARE_AND_SOFTWARE: u8 = 0;

/// Opaque identifier of one button instance (the host's `context`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlId(pub String);

impl ControlId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ControlId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-control settings as stored by the host.
pub type Settings = Map<String, Value>;

// --- Inbound ---

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
enum InboundMessage {
    WillAppear(ActionMessage),
    WillDisappear(ActionMessage),
    DidReceiveSettings(ActionMessage),
    KeyDown(ActionMessage),
    KeyUp(ActionMessage),
    TitleParametersDidChange(ActionMessage),
    DidReceiveGlobalSettings {
        #[serde(default)]
        payload: SettingsPayload,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ActionMessage {
    action: String,
    context: ControlId,
    #[serde(default)]
    payload: SettingsPayload,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsPayload {
    #[serde(default)]
    settings: Option<Settings>,
    #[serde(default)]
    title: Option<String>,
}

/// What happened to a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The control became visible (`willAppear`).
    Show,
    /// The control is going away (`willDisappear`).
    Hide,
    /// Its settings were edited (`didReceiveSettings`).
    SettingsChanged,
    /// Key press (`keyDown`).
    Activate,
    /// Key release (`keyUp`).
    Deactivate,
    /// The user edited the button title (`titleParametersDidChange`).
    TitleChanged { title: String },
}

/// An event addressed to one control of one action type.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    pub kind: EventKind,
    /// Action UUID, e.g. `fm.kenku.remote.soundboard-play`.
    pub action: String,
    pub control: ControlId,
    pub settings: Settings,
}

/// A decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Action(ActionEvent),
    GlobalSettings(Settings),
    /// An event this plugin does not handle (device connects, app launches...).
    Ignored,
}

impl HostEvent {
    /// Decode one text frame.
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let message: InboundMessage = serde_json::from_str(text)?;
        Ok(message.into())
    }
}

impl From<InboundMessage> for HostEvent {
    fn from(message: InboundMessage) -> Self {
        let (kind, msg) = match message {
            InboundMessage::WillAppear(m) => (EventKind::Show, m),
            InboundMessage::WillDisappear(m) => (EventKind::Hide, m),
            InboundMessage::DidReceiveSettings(m) => (EventKind::SettingsChanged, m),
            InboundMessage::KeyDown(m) => (EventKind::Activate, m),
            InboundMessage::KeyUp(m) => (EventKind::Deactivate, m),
            InboundMessage::TitleParametersDidChange(mut m) => {
                let title = m.payload.title.take().unwrap_or_default();
                (EventKind::TitleChanged { title }, m)
            }
            InboundMessage::DidReceiveGlobalSettings { payload } => {
                return HostEvent::GlobalSettings(payload.settings.unwrap_or_default());
            }
            InboundMessage::Other => return HostEvent::Ignored,
        };

        HostEvent::Action(ActionEvent {
            kind,
            action: msg.action,
            control: msg.context,
            settings: msg.payload.settings.unwrap_or_default(),
        })
    }
}

// --- Outbound ---

/// Registration frame sent once the socket opens.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    /// Event name handed to the plugin on its command line.
    pub event: String,
    pub uuid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagePayload {
    pub image: String,
    pub target: u8,
}

/// Commands sent to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum OutboundMessage {
    SetImage { context: ControlId, payload: ImagePayload },
    ShowAlert { context: ControlId },
    GetSettings { context: ControlId },
    GetGlobalSettings { context: String },
    SetSettings { context: ControlId, payload: Value },
    SetGlobalSettings { context: String, payload: Value },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_key_down() {
        let event = HostEvent::parse(
            r#"{
                "action": "fm.kenku.remote.soundboard-play",
                "event": "keyDown",
                "context": "ctx-1",
                "device": "dev",
                "payload": {"settings": {"id": "s1"}, "coordinates": {"column": 1, "row": 0}, "isInMultiAction": false}
            }"#,
        )
        .unwrap();

        let HostEvent::Action(event) = event else {
            panic!("expected an action event");
        };
        assert_eq!(event.kind, EventKind::Activate);
        assert_eq!(event.action, "fm.kenku.remote.soundboard-play");
        assert_eq!(event.control, ControlId::from("ctx-1"));
        assert_eq!(event.settings.get("id"), Some(&json!("s1")));
    }

    #[test]
    fn test_parse_title_change() {
        let event = HostEvent::parse(
            r#"{"action": "fm.kenku.remote.play", "event": "titleParametersDidChange", "context": "c",
                "payload": {"settings": {"url": "u"}, "title": "Battle", "titleParameters": {"fontSize": 12}}}"#,
        )
        .unwrap();

        let HostEvent::Action(event) = event else {
            panic!("expected an action event");
        };
        assert_eq!(
            event.kind,
            EventKind::TitleChanged {
                title: "Battle".to_string()
            }
        );
    }

    #[test]
    fn test_parse_global_settings_and_unknown_events() {
        let global = HostEvent::parse(
            r#"{"event": "didReceiveGlobalSettings", "payload": {"settings": {"address": "10.0.0.5", "port": "3333"}}}"#,
        )
        .unwrap();
        let HostEvent::GlobalSettings(settings) = global else {
            panic!("expected global settings");
        };
        assert_eq!(settings.get("address"), Some(&json!("10.0.0.5")));

        let other = HostEvent::parse(r#"{"event": "deviceDidConnect", "device": "d"}"#).unwrap();
        assert_eq!(other, HostEvent::Ignored);
    }

    #[test]
    fn test_missing_settings_become_empty() {
        let event = HostEvent::parse(
            r#"{"action": "fm.kenku.remote.playlist-playback", "event": "willDisappear", "context": "c", "payload": {}}"#,
        )
        .unwrap();
        let HostEvent::Action(event) = event else {
            panic!("expected an action event");
        };
        assert_eq!(event.kind, EventKind::Hide);
        assert!(event.settings.is_empty());
    }

    #[test]
    fn test_encode_outbound() {
        let set_image = OutboundMessage::SetImage {
            context: ControlId::from("c"),
            payload: ImagePayload {
                image: "data:image/png;base64,AA==".to_string(),
                target: TARGET_HARDWARE_AND_SOFTWARE,
            },
        };
        assert_eq!(
            serde_json::to_value(&set_image).unwrap(),
            json!({"event": "setImage", "context": "c", "payload": {"image": "data:image/png;base64,AA==", "target": 0}})
        );

        let alert = OutboundMessage::ShowAlert {
            context: ControlId::from("c"),
        };
        assert_eq!(
            serde_json::to_value(&alert).unwrap(),
            json!({"event": "showAlert", "context": "c"})
        );

        let global = OutboundMessage::SetGlobalSettings {
            context: "plugin".to_string(),
            payload: json!({"address": "127.0.0.1", "port": 3333}),
        };
        assert_eq!(serde_json::to_value(&global).unwrap()["event"], "setGlobalSettings");
    }
}
