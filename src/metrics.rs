//! Prometheus metrics for HTTP request tracking.
//!
//! Metrics are recorded through the `metrics` facade. When an exporter is
//! installed (see [`install_exporter`]) they are scraped from a listener that
//! is separate from the diagnostic API.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{extract::MatchedPath, extract::Request, middleware::Next, response::Response};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::debug;

use crate::error::{Result, ServiceError};

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";

/// Path label used for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(
        METRIC_HTTP_REQUESTS,
        "Total number of HTTP requests served"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn install_exporter(addr: SocketAddr) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ServiceError::Metrics(e.to_string()))
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, path: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "path" => path.to_string()).record(latency_ms);
}

/// Increment HTTP requests counter.
pub fn inc_http_requests(method: &str, path: &str, status: u16) {
    counter!(
        METRIC_HTTP_REQUESTS,
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Label for a request path: the matched route, or [`UNMATCHED_PATH`].
pub fn path_label(matched: Option<&MatchedPath>) -> &str {
    matched.map(MatchedPath::as_str).unwrap_or(UNMATCHED_PATH)
}

/// Axum middleware recording a counter and latency for every request.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = path_label(request.extensions().get::<MatchedPath>()).to_string();

    let response = next.run(request).await;

    inc_http_requests(&method, &path, response.status().as_u16());
    record_http_latency(start, &path);

    response
}
