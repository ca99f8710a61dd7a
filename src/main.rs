//! Remote Deck
//!
//! Panel host plugin that drives a remote playback server.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 REMOTE DECK                  │
//!                    │                                              │
//!   Panel host  ◀───▶│  host::connection ──▶ actions::registry ─────┼──┐
//!   (WebSocket)      │        ▲                    │                │  │
//!                    │        │ outbox             ▼                │  │
//!                    │        └────────── sync::reconciler          │  │  HTTP/JSON
//!                    │                             ▲                │  ├──────────▶ Playback
//!                    │                     sync::poller             │  │            server
//!                    │                             │                │  │
//!                    │                  resilience::circuit_breaker ┼──┘
//!                    │                                              │
//!                    │  config · observability · lifecycle · assets │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! The host launches the plugin as
//! `remote-deck -port <n> -pluginUUID <uuid> -registerEvent <event> -info <json>`.

use std::path::PathBuf;

use clap::Parser;

use remote_deck::config;
use remote_deck::host::HostIdentity;
use remote_deck::lifecycle::run_plugin;
use remote_deck::observability::{init_logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "remote-deck")]
#[command(about = "Panel host plugin for a remote playback server", long_about = None)]
struct PluginArgs {
    /// Port of the host's WebSocket server.
    #[arg(long)]
    port: u16,

    #[arg(long = "pluginUUID")]
    plugin_uuid: String,

    #[arg(long = "registerEvent")]
    register_event: String,

    /// Host and device information (JSON). Logged, otherwise unused.
    #[arg(long)]
    info: Option<String>,

    /// Configuration file. Defaults to remote-deck.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// The host passes long flags with a single dash (`-port 28196`).
fn normalize_flags(args: impl IntoIterator<Item = String>) -> Vec<String> {
    args.into_iter()
        .enumerate()
        .map(|(i, arg)| {
            let single_dash_long = i > 0
                && arg.len() > 2
                && arg.starts_with('-')
                && !arg.starts_with("--")
                && arg[1..].starts_with(|c: char| c.is_ascii_alphabetic());
            if single_dash_long {
                format!("-{}", arg)
            } else {
                arg
            }
        })
        .collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = PluginArgs::parse_from(normalize_flags(std::env::args()));

    let config = config::load_or_default(args.config.as_deref())?;
    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        plugin_uuid = %args.plugin_uuid,
        "remote-deck starting"
    );
    if let Some(info) = &args.info {
        tracing::debug!(info = %info, "Host info");
    }

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let identity = HostIdentity {
        port: args.port,
        plugin_uuid: args.plugin_uuid,
        register_event: args.register_event,
    };
    run_plugin(config, identity).await?;
    Ok(())
}
