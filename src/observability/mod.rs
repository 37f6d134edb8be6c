//! # Observability Infrastructure
//!
//! Structured logging and Prometheus metrics for the certwatch server.

pub mod http_tracing;
pub mod logging;
pub mod metrics;

pub use http_tracing::track_http_requests;
pub use logging::{init_logging, log_config_info};
pub use metrics::{init_metrics, MetricsRecorder};

use crate::config::ObservabilityConfig;
use crate::errors::Result;
use ::tracing::info;

/// Initialize all observability components.
pub async fn init_observability(config: &ObservabilityConfig) -> Result<()> {
    init_logging(config)?;

    if config.enable_metrics {
        init_metrics(config).await?;
    }

    info!(
        log_level = %config.log_level,
        log_format = %config.log_format,
        metrics_enabled = %config.enable_metrics,
        "Observability initialized"
    );

    Ok(())
}
