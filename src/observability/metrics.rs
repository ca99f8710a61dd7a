//! Metrics collection and exposition.
//!
//! # Metrics
//! - `deck_polls_total` (counter): poll cycles by outcome (ok, failed, rejected)
//! - `deck_breaker_state` (gauge): 0=open, 1=half, 2=closed
//! - `deck_display_updates_total` (counter): image updates queued for the host
//! - `deck_actions_total` (counter): button activations by action and result
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::BreakerState;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_poll(outcome: &'static str) {
    metrics::counter!("deck_polls_total", "outcome" => outcome).increment(1);
}

pub fn record_breaker_state(state: BreakerState) {
    let value = match state {
        BreakerState::Open => 0.0,
        BreakerState::Half => 1.0,
        BreakerState::Closed => 2.0,
    };
    metrics::gauge!("deck_breaker_state").set(value);
}

pub fn record_display_updates(count: usize) {
    if count > 0 {
        metrics::counter!("deck_display_updates_total").increment(count as u64);
    }
}

pub fn record_action(action: &'static str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::counter!("deck_actions_total", "action" => action, "result" => result).increment(1);
}
