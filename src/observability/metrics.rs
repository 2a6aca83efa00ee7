//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relay calls by operation, outcome
//! - `relay_request_duration_seconds` (histogram): end-to-end relay latency
//! - `relay_upstream_attempts_total` (counter): per-host attempts by operation, outcome
//! - `relay_pinned_host_changes_total` (counter): pin moved to a different host
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished relay call.
pub fn record_relay(operation: &'static str, outcome: &'static str, start: Instant) {
    counter!("relay_requests_total", "operation" => operation, "outcome" => outcome).increment(1);
    histogram!("relay_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record one host attempt.
pub fn record_attempt(operation: &'static str, outcome: &'static str) {
    counter!("relay_upstream_attempts_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}

/// Record the pin moving to `host`.
pub fn record_pin_change(host: &str) {
    counter!("relay_pinned_host_changes_total", "base_url" => host.to_string()).increment(1);
}
