//! Settings stored by the panel host.
//!
//! The host owns persistence: the plugin receives these payloads in
//! `didReceiveGlobalSettings` and writes them back with `setGlobalSettings`.
//! Property inspectors submit form values, so numeric fields may arrive as
//! strings.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::config::schema::RemoteConfig;
use crate::remote::RemoteEndpoint;

/// Plugin-wide settings: where the remote playback server lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(
        default,
        deserialize_with = "port_from_any",
        skip_serializing_if = "Option::is_none"
    )]
    pub port: Option<u16>,
}

impl GlobalSettings {
    /// Settings matching the configured defaults.
    pub fn from_remote(remote: &RemoteConfig) -> Self {
        Self {
            address: Some(remote.address.clone()),
            port: Some(remote.port),
        }
    }

    /// True when the host has nothing stored yet.
    pub fn is_empty(&self) -> bool {
        self.address.as_deref().map_or(true, |a| a.trim().is_empty()) && self.port.is_none()
    }

    /// Apply these settings on top of `current`, keeping fields that are unset.
    pub fn apply_to(&self, current: &RemoteEndpoint) -> RemoteEndpoint {
        let mut endpoint = current.clone();
        if let Some(address) = self.address.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
            endpoint.address = address.to_string();
        }
        if let Some(port) = self.port {
            endpoint.port = port;
        }
        endpoint
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PortRepr {
    Number(u64),
    Text(String),
}

/// Accept a port as a JSON number or a (possibly empty) string.
pub(crate) fn port_from_any<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<PortRepr>::deserialize(deserializer)? {
        None => Ok(None),
        Some(PortRepr::Number(n)) => u16::try_from(n)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("port {} out of range", n))),
        Some(PortRepr::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse::<u16>()
                    .map(Some)
                    .map_err(|e| D::Error::custom(format!("invalid port '{}': {}", s, e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_port_accepts_string_and_number() {
        let from_text: GlobalSettings =
            serde_json::from_value(json!({"address": "10.0.0.2", "port": "4000"})).unwrap();
        let from_number: GlobalSettings = serde_json::from_value(json!({"port": 4000})).unwrap();

        assert_eq!(from_text.port, Some(4000));
        assert_eq!(from_number.port, Some(4000));
        assert!(serde_json::from_value::<GlobalSettings>(json!({"port": "abc"})).is_err());
    }

    #[test]
    fn test_empty_settings() {
        let settings: GlobalSettings = serde_json::from_value(json!({})).unwrap();
        assert!(settings.is_empty());

        let blank: GlobalSettings =
            serde_json::from_value(json!({"address": "", "port": ""})).unwrap();
        assert!(blank.is_empty());
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let current = RemoteEndpoint::new("127.0.0.1", 3333, Some("v1"));
        let settings = GlobalSettings {
            address: None,
            port: Some(4000),
        };

        let next = settings.apply_to(&current);
        assert_eq!(next.address, "127.0.0.1");
        assert_eq!(next.port, 4000);
        assert_eq!(next.version.as_deref(), Some("v1"));
    }
}
