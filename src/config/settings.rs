//! # Configuration Settings
//!
//! Defines the configuration structure for the certwatch server.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::AuthKind;
use crate::backends::BackendKind;
use crate::errors::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    #[validate(nested)]
    pub server: ServerConfig,

    /// Frontend authentication configuration
    pub auth: AuthConfig,

    /// Refresh scheduling configuration
    #[validate(nested)]
    pub refresh: RefreshConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,

    /// Certificate source backends, fixed for the process lifetime
    pub backends: Vec<BackendDescriptor>,
}

impl AppConfig {
    /// Load configuration from a YAML manifest, apply environment overrides,
    /// and validate the result.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            Error::config(format!("Could not read config file {}: {}", path.display(), err))
        })?;
        let mut config = Self::from_yaml(&raw)?;
        config.apply_env_overrides()?;
        config.validate_all()?;
        Ok(config)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|err| Error::config(format!("Invalid config: {}", err)))
    }

    /// Apply `CERTWATCH_*` environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("CERTWATCH_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CERTWATCH_PORT") {
            self.server.port =
                port.parse().map_err(|err| Error::config(format!("Invalid CERTWATCH_PORT: {}", err)))?;
        }
        if let Ok(level) = std::env::var("CERTWATCH_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(seconds) = std::env::var("CERTWATCH_REFRESH_INTERVAL_SECONDS") {
            self.refresh.interval_seconds = seconds.parse().map_err(|err| {
                Error::config(format!("Invalid CERTWATCH_REFRESH_INTERVAL_SECONDS: {}", err))
            })?;
        }
        Ok(())
    }

    /// Validate the entire configuration.
    pub fn validate_all(&self) -> Result<()> {
        Validate::validate(self).map_err(|err| Error::config(err.to_string()))?;
        self.validate_custom()
    }

    /// Cross-field validation beyond what the validator derive expresses.
    fn validate_custom(&self) -> Result<()> {
        let mut names = HashSet::new();
        for backend in &self.backends {
            if backend.name.is_empty() {
                return Err(Error::config("Backend name cannot be empty"));
            }
            if !names.insert(backend.name.as_str()) {
                return Err(Error::config(format!("Duplicate backend name `{}'", backend.name)));
            }
            match &backend.settings {
                BackendSettings::TlsEndpoint { hosts } if hosts.is_empty() => {
                    return Err(Error::config(format!(
                        "Backend `{}' must configure at least one host",
                        backend.name
                    )));
                }
                BackendSettings::PemDirectory { path } if path.as_os_str().is_empty() => {
                    return Err(Error::config(format!(
                        "Backend `{}' must configure a directory path",
                        backend.name
                    )));
                }
                _ => {}
            }
        }

        if self.observability.enable_metrics && self.observability.metrics_port == self.server.port
        {
            return Err(Error::config("Server and metrics ports cannot be the same"));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    #[validate(length(min = 1, message = "Host cannot be empty"))]
    pub host: String,

    /// Server port
    #[validate(range(min = 1, message = "Port must be nonzero"))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: 8111 }
    }
}

impl ServerConfig {
    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Frontend authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// The authorizer kind wrapping the cache endpoints
    #[serde(rename = "type")]
    pub kind: AuthKind,
}

/// Refresh scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RefreshConfig {
    /// Seconds between periodic refresh runs
    #[validate(range(min = 1, message = "Refresh interval must be at least one second"))]
    pub interval_seconds: u64,

    /// Per-backend fetch timeout in seconds
    #[validate(range(
        min = 1,
        max = 3600,
        message = "Backend timeout must be between 1 and 3600 seconds"
    ))]
    pub backend_timeout_seconds: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_seconds: 3600, backend_timeout_seconds: 30 }
    }
}

impl RefreshConfig {
    /// Get the periodic refresh interval as Duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    /// Get the per-backend timeout as Duration
    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_seconds)
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Log output format
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics exporter
    pub enable_metrics: bool,

    /// Metrics exporter bind address
    pub metrics_host: String,

    /// Metrics exporter port
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            enable_metrics: false,
            metrics_host: "0.0.0.0".to_string(),
            metrics_port: 9090,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// One configured certificate source, immutable after server start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendDescriptor {
    /// Unique backend name; namespaces this backend's cache keys
    pub name: String,

    /// Kind tag plus kind-specific connection parameters
    #[serde(flatten)]
    pub settings: BackendSettings,
}

/// Kind-specific backend connection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendSettings {
    /// Probe live TLS endpoints for the certificate they serve
    TlsEndpoint { hosts: Vec<String> },
    /// Scan a directory tree of PEM-encoded certificates
    PemDirectory { path: PathBuf },
}

impl BackendSettings {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::TlsEndpoint { .. } => BackendKind::TlsEndpoint,
            Self::PemDirectory { .. } => BackendKind::PemDirectory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
server:
  host: 127.0.0.1
  port: 9111
refresh:
  interval_seconds: 600
  backend_timeout_seconds: 15
auth:
  type: none
backends:
  - name: edge-lbs
    type: tls_endpoint
    hosts:
      - lb1.internal:443
      - lb2.internal:8443
  - name: local-pki
    type: pem_directory
    path: /etc/ssl/private
"#;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate_all().unwrap();
        assert_eq!(config.server.port, 8111);
        assert_eq!(config.refresh.interval_seconds, 3600);
        assert!(config.backends.is_empty());
    }

    #[test]
    fn test_parse_full_manifest() {
        let config = AppConfig::from_yaml(MANIFEST).unwrap();
        config.validate_all().unwrap();

        assert_eq!(config.server.bind_address(), "127.0.0.1:9111");
        assert_eq!(config.refresh.interval(), Duration::from_secs(600));
        assert_eq!(config.refresh.backend_timeout(), Duration::from_secs(15));
        assert_eq!(config.backends.len(), 2);

        match &config.backends[0].settings {
            BackendSettings::TlsEndpoint { hosts } => assert_eq!(hosts.len(), 2),
            other => panic!("unexpected backend settings: {:?}", other),
        }
        assert_eq!(config.backends[1].settings.kind(), BackendKind::PemDirectory);
    }

    #[test]
    fn test_unknown_backend_type_rejected() {
        let raw = r#"
backends:
  - name: corp-vault
    type: vault
    address: https://vault.internal
"#;
        assert!(AppConfig::from_yaml(raw).is_err());
    }

    #[test]
    fn test_duplicate_backend_names_rejected() {
        let raw = r#"
backends:
  - name: pki
    type: pem_directory
    path: /a
  - name: pki
    type: pem_directory
    path: /b
"#;
        let config = AppConfig::from_yaml(raw).unwrap();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_empty_host_list_rejected() {
        let raw = r#"
backends:
  - name: edge
    type: tls_endpoint
    hosts: []
"#;
        let config = AppConfig::from_yaml(raw).unwrap();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let raw = r#"
refresh:
  interval_seconds: 0
"#;
        let config = AppConfig::from_yaml(raw).unwrap();
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_metrics_port_conflict_rejected() {
        let raw = r#"
server:
  port: 9090
observability:
  enable_metrics: true
  metrics_port: 9090
"#;
        let config = AppConfig::from_yaml(raw).unwrap();
        assert!(config.validate_all().is_err());
    }
}
