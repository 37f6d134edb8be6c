//! # Structured Logging
//!
//! Logging setup using the tracing ecosystem. The configured level is the
//! default filter; a `RUST_LOG` environment variable overrides it entirely.

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat, ObservabilityConfig};
use crate::errors::Result;

/// Install the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    // A subscriber may already be installed (e.g. integration tests); keep
    // the existing one in that case.
    let _ = match config.log_format {
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
    };

    Ok(())
}

/// Log the effective configuration at startup.
pub fn log_config_info(config: &AppConfig) {
    info!(
        server_address = %config.server.bind_address(),
        backends = config.backends.len(),
        refresh_interval_secs = config.refresh.interval_seconds,
        backend_timeout_secs = config.refresh.backend_timeout_seconds,
        auth_kind = %config.auth.kind,
        metrics_enabled = %config.observability.enable_metrics,
        "certwatch server configuration"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_info_does_not_panic() {
        let config = AppConfig::default();
        log_config_info(&config);
    }
}
