//! OS signal handling.
//!
//! SIGINT (and SIGTERM on Unix) trigger shutdown. The host normally ends the
//! plugin by closing its socket; signals cover running it by hand.

use crate::lifecycle::shutdown::Shutdown;

/// Wait for an interrupt and trigger `shutdown`.
pub async fn shutdown_on_signal(shutdown: Shutdown) {
    wait_for_signal().await;
    shutdown.trigger();
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGTERM handler");
            return wait_for_interrupt().await;
        }
    };

    tokio::select! {
        _ = wait_for_interrupt() => {}
        _ = terminate.recv() => tracing::info!("SIGTERM received, shutting down"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    wait_for_interrupt().await;
}

async fn wait_for_interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Interrupt received, shutting down"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for interrupt");
            std::future::pending::<()>().await;
        }
    }
}
