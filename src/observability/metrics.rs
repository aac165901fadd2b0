//! Metrics collection and exposition.
//!
//! # Metrics
//! - `demo_http_requests_total` (counter): requests by method, route, status
//! - `demo_http_request_duration_seconds` (histogram): latency by method, route
//! - `demo_messages_appended_total` (counter): successful appends
//! - `demo_store_errors_total` (counter): store failures by operation
//!
//! # Design Decisions
//! - Route label is the matched route template, never the raw path
//! - Recording is a no-op until `init_metrics` installs the exporter

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "demo_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "demo_http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a successful append.
pub fn record_append() {
    counter!("demo_messages_appended_total").increment(1);
}

/// Record a store failure for `operation` ("append", "list", "ping").
pub fn record_store_error(operation: &'static str) {
    counter!("demo_store_errors_total", "operation" => operation).increment(1);
}

/// Route-layer middleware feeding [`record_request`].
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let method = request.method().to_string();

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
