//! Remote Deck Plugin Library

pub mod actions;
pub mod assets;
pub mod config;
pub mod host;
pub mod lifecycle;
pub mod observability;
pub mod remote;
pub mod resilience;
pub mod sync;

pub use actions::ActionRegistry;
pub use config::schema::PluginConfig;
pub use lifecycle::{run_plugin, Shutdown};
pub use remote::RemoteClient;
