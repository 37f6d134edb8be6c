//! # Configuration Management
//!
//! Loads the operator-facing YAML manifest, applies `CERTWATCH_*` environment
//! overrides, and validates the result before the server starts.

pub mod settings;

pub use settings::{
    AppConfig, AuthConfig, BackendDescriptor, BackendSettings, LogFormat, ObservabilityConfig,
    RefreshConfig, ServerConfig,
};
