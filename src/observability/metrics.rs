//! # Metrics Collection
//!
//! Prometheus metrics for refresh runs, backend fetches, and HTTP traffic.

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};

/// Install the Prometheus exporter and register instrument descriptions.
pub async fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.metrics_host, config.metrics_port)
        .parse()
        .map_err(|err| Error::config(format!("Invalid metrics address: {}", err)))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| Error::internal(format!("Failed to install Prometheus exporter: {}", err)))?;

    describe_counter!("refresh_runs_total", "Completed cache refresh runs by trigger");
    describe_histogram!(
        "refresh_duration_seconds",
        Unit::Seconds,
        "Wall-clock duration of cache refresh runs"
    );
    describe_gauge!("cache_items", "Certificates in the currently published snapshot");
    describe_counter!("backend_fetch_total", "Backend fetch attempts by backend and outcome");
    describe_histogram!(
        "backend_fetch_duration_seconds",
        Unit::Seconds,
        "Duration of individual backend fetches"
    );
    describe_counter!("http_requests_total", "HTTP requests by method, path, and status");
    describe_histogram!(
        "http_request_duration_seconds",
        Unit::Seconds,
        "HTTP request handling duration"
    );

    info!(address = %addr, "Prometheus metrics exporter listening");
    Ok(())
}

/// Records application metrics through the `metrics` facade.
///
/// All methods are no-ops until an exporter is installed, so instrumented
/// code paths are safe to exercise in tests.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn new() -> Self {
        Self
    }

    /// Record one completed refresh run and the resulting cache size.
    pub fn record_refresh_run(&self, trigger: &str, duration: Duration, items: usize) {
        counter!("refresh_runs_total", "trigger" => trigger.to_string()).increment(1);
        histogram!("refresh_duration_seconds").record(duration.as_secs_f64());
        gauge!("cache_items").set(items as f64);
    }

    /// Record one backend fetch attempt.
    pub fn record_backend_fetch(&self, backend: &str, success: bool, duration: Duration) {
        let outcome = if success { "success" } else { "error" };
        counter!(
            "backend_fetch_total",
            "backend" => backend.to_string(),
            "outcome" => outcome
        )
        .increment(1);
        histogram!("backend_fetch_duration_seconds", "backend" => backend.to_string())
            .record(duration.as_secs_f64());
    }

    /// Record one handled HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration: Duration) {
        counter!(
            "http_requests_total",
            "method" => method.to_string(),
            "path" => path.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
        histogram!(
            "http_request_duration_seconds",
            "method" => method.to_string(),
            "path" => path.to_string()
        )
        .record(duration.as_secs_f64());
    }
}
