//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PluginConfig (validated, immutable)
//!
//! Panel host global settings (address/port):
//!     didReceiveGlobalSettings
//!     → settings.rs (lenient decoding)
//!     → atomic swap of the remote endpoint
//! ```
//!
//! # Design Decisions
//! - The file config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Only the remote endpoint changes at runtime, driven by the host

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AssetsConfig, BreakerConfig, HostConfig, ObservabilityConfig, PluginConfig, PollingConfig,
    RemoteConfig,
};
pub use settings::GlobalSettings;
