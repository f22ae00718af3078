//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by method, status, decision
//! - `router_request_duration_seconds` (histogram): latency by decision
//! - `router_route_table_policies` (gauge): virtual ports in the route table
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are bounded: decision is "forward" or "passthrough"

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, decision: &'static str, start: Instant) {
    counter!(
        "router_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "decision" => decision
    )
    .increment(1);

    histogram!("router_request_duration_seconds", "decision" => decision)
        .record(start.elapsed().as_secs_f64());
}

/// Record the size of the active route table.
pub fn record_route_table(policies: usize) {
    gauge!("router_route_table_policies").set(policies as f64);
}
