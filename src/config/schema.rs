//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the plugin.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the plugin.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PluginConfig {
    /// Remote playback server connection.
    pub remote: RemoteConfig,

    /// Playback polling cadence.
    pub polling: PollingConfig,

    /// Circuit breaker thresholds guarding the poller.
    pub breaker: BreakerConfig,

    /// Panel host connection settings.
    pub host: HostConfig,

    /// Button image assets.
    pub assets: AssetsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Remote playback server configuration.
///
/// `address` and `port` are only the starting values: the panel host's
/// global settings replace them at runtime.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Server address (e.g., "127.0.0.1").
    pub address: String,

    /// Server port.
    pub port: u16,

    /// API version path prefix.
    pub api_version: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 3333,
            api_version: "v1".to_string(),
            request_timeout_secs: 5,
        }
    }
}

/// Playback polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Interval between polls in milliseconds.
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BreakerConfig {
    /// Length of the probe window while half open, in milliseconds.
    pub open_timeout_ms: u64,

    /// Time to wait while closed before letting one probe through, in milliseconds.
    pub closed_timeout_ms: u64,

    /// Failures inside the probe window before the failure rate is evaluated.
    pub failed_request_threshold: u32,

    /// Failure rate (percent) at which the breaker closes.
    pub failed_request_percentage_threshold: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            open_timeout_ms: 10_000,
            closed_timeout_ms: 15_000,
            failed_request_threshold: 5,
            failed_request_percentage_threshold: 50,
        }
    }
}

impl BreakerConfig {
    pub fn open_timeout(&self) -> Duration {
        Duration::from_millis(self.open_timeout_ms)
    }

    pub fn closed_timeout(&self) -> Duration {
        Duration::from_millis(self.closed_timeout_ms)
    }
}

/// Panel host connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// Connection attempts before giving up at startup.
    pub connect_attempts: u32,

    /// Base delay for the reconnect backoff in milliseconds.
    pub backoff_base_ms: u64,

    /// Maximum reconnect delay in milliseconds.
    pub backoff_max_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            connect_attempts: 5,
            backoff_base_ms: 200,
            backoff_max_ms: 2000,
        }
    }
}

/// Image asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Directory holding the button images, relative to the working directory.
    pub directory: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            directory: "assets".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default `tracing` filter, overridden by `RUST_LOG`.
    pub log_filter: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter listen address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "remote_deck=info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9464".to_string(),
        }
    }
}
