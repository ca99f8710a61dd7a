//! Background polling of the remote playback server.
//!
//! # Responsibilities
//! - Fetch playlist and soundboard playback on a fixed interval
//! - Route every fetch through the circuit breaker
//! - Hand complete snapshots to the reconciler

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::observability::metrics;
use crate::remote::{RemoteClient, RequestError};
use crate::resilience::{BreakerError, CircuitBreaker};
use crate::sync::reconciler::Reconciler;

pub struct PlaybackPoller {
    client: RemoteClient,
    breaker: Arc<CircuitBreaker>,
    reconciler: Arc<Reconciler>,
    interval: Duration,
}

impl PlaybackPoller {
    pub fn new(
        client: RemoteClient,
        breaker: Arc<CircuitBreaker>,
        reconciler: Arc<Reconciler>,
        interval: Duration,
    ) -> Self {
        Self {
            client,
            breaker,
            reconciler,
            interval,
        }
    }

    /// Poll until shutdown. Each tick runs in its own task so a slow server
    /// never delays the next tick.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Playback poller starting");

        let poller = Arc::new(self);
        let mut ticker = time::interval(poller.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let poller = Arc::clone(&poller);
                    tokio::spawn(async move {
                        poller.poll_once().await;
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!("Playback poller received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Run one poll cycle. Returns the number of display updates queued.
    pub async fn poll_once(&self) -> usize {
        let result = self
            .breaker
            .fire(|| self.client.fetch_snapshot())
            .await;

        match result {
            Ok(snapshot) => {
                metrics::record_poll("ok");
                self.reconciler.apply(snapshot)
            }
            Err(BreakerError::Rejected) => {
                tracing::debug!("Poll skipped, remote server marked unavailable");
                metrics::record_poll("rejected");
                0
            }
            Err(BreakerError::Inner(e)) => {
                log_failure(&e);
                metrics::record_poll("failed");
                0
            }
        }
    }
}

fn log_failure(error: &RequestError) {
    if error.is_transport() {
        tracing::debug!(error = %error, "Poll failed, remote server unreachable");
    } else {
        tracing::debug!(error = %error, "Poll failed");
    }
}
