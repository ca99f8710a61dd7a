//! Startup orchestration.
//!
//! # Responsibilities
//! - Build every subsystem from the validated configuration
//! - Connect and register with the panel host
//! - Start background polling and the host session
//!
//! # Design Decisions
//! - The host connection comes before polling: there is nobody to show
//!   state to until it exists
//! - Global settings are requested as the first queued command, right after
//!   registration

use std::sync::Arc;

use thiserror::Error;

use crate::actions::ActionRegistry;
use crate::assets::ImageCache;
use crate::config::PluginConfig;
use crate::host::{self, HostError, HostIdentity, HostSession, Outbox};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::remote::{RemoteClient, RequestError};
use crate::resilience::CircuitBreaker;
use crate::sync::{PlaybackPoller, Reconciler};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build remote client: {0}")]
    Client(#[from] RequestError),

    #[error(transparent)]
    Host(#[from] HostError),
}

/// Run the plugin until the panel host disconnects or a signal arrives.
pub async fn run_plugin(config: PluginConfig, identity: HostIdentity) -> Result<(), StartupError> {
    let shutdown = Shutdown::new();

    let client = RemoteClient::from_config(&config.remote)?;
    let (outbox, commands) = Outbox::channel();
    let reconciler = Arc::new(Reconciler::new(outbox.clone()));
    let breaker = Arc::new(CircuitBreaker::new(&config.breaker));
    let registry = Arc::new(ActionRegistry::new(
        client.clone(),
        Arc::clone(&reconciler),
        outbox.clone(),
        config.remote.clone(),
    ));
    let images = ImageCache::new(config.assets.directory.clone());

    tracing::info!(
        remote = %client.endpoint(),
        poll_interval_ms = config.polling.interval_ms,
        assets = %config.assets.directory,
        "Subsystems initialized"
    );

    let stream = host::connect(&identity, &config.host).await?;

    let poller = PlaybackPoller::new(client, breaker, reconciler, config.polling.interval());
    let poller_task = tokio::spawn(poller.run(shutdown.subscribe()));
    let signal_task = tokio::spawn(signals::shutdown_on_signal(shutdown.clone()));

    outbox.request_global_settings();

    let session = HostSession::new(identity, registry, images);
    let result = session.run(stream, commands, shutdown.subscribe()).await;

    shutdown.trigger();
    signal_task.abort();
    if let Err(e) = poller_task.await {
        tracing::warn!(error = %e, "Playback poller task failed");
    }

    match &result {
        Ok(()) => tracing::info!("Shutdown complete"),
        Err(e) => tracing::error!(error = %e, "Host session ended with error"),
    }
    result.map_err(StartupError::from)
}
