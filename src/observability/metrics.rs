//! Metrics collection and exposition.
//!
//! # Metrics
//! - `watcher_blocks_total` (counter): header notifications received
//! - `watcher_transfer_attempts_total` (counter): transfer attempts by outcome
//! - `trade_units_total` (counter): trade units by venue and outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_block() {
    metrics::counter!("watcher_blocks_total").increment(1);
}

/// `outcome` is "sent" or the failing step ("nonce", "gas_price", "sign", "send").
pub fn record_transfer_attempt(outcome: &'static str) {
    metrics::counter!("watcher_transfer_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_trade_unit(venue: &str, success: bool) {
    let outcome = if success { "success" } else { "error" };
    metrics::counter!(
        "trade_units_total",
        "venue" => venue.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
