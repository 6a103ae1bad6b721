//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, route, classification
//! - `proxy_request_duration_seconds` (histogram): latency per route
//! - `proxy_upstream_errors_total` (counter): transport failures by route and kind
//! - `proxy_retries_total` (counter): retries per route
//! - `proxy_cache_lookups_total` (counter): cache hits and misses per route

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a relayed or rejected request.
pub fn record_request(method: &str, status: u16, route: &str, classification: &str, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string(),
        "classification" => classification.to_string()
    )
    .increment(1);

    metrics::histogram!("proxy_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a transport failure towards a backend.
pub fn record_upstream_error(route: &str, kind: &'static str) {
    metrics::counter!(
        "proxy_upstream_errors_total",
        "route" => route.to_string(),
        "kind" => kind
    )
    .increment(1);
}

/// Record a retry attempt.
pub fn record_retry(route: &str) {
    metrics::counter!("proxy_retries_total", "route" => route.to_string()).increment(1);
}

/// Record a cache lookup.
pub fn record_cache_lookup(route: &str, hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    metrics::counter!(
        "proxy_cache_lookups_total",
        "route" => route.to_string(),
        "result" => result
    )
    .increment(1);
}
