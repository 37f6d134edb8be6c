//! # HTTP Request Tracking Middleware
//!
//! Axum middleware that logs each handled request with structured fields and
//! records the request counter/duration instruments.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::debug;

use super::metrics::MetricsRecorder;

/// Log and measure every HTTP request passing through the router.
pub async fn track_http_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed = start.elapsed();
    debug!(
        method = %method,
        path = %path,
        status = status,
        elapsed_ms = elapsed.as_millis() as u64,
        "Handled HTTP request"
    );

    // The route set is small and static, so raw paths are safe label values.
    MetricsRecorder::new().record_http_request(&method, &path, status, elapsed);

    response
}
