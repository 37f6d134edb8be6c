//! # Error Handling
//!
//! Crate-level error types for the certwatch server, defined with `thiserror`.
//! The HTTP layer maps these onto wire responses in [`crate::api::error`].

/// Custom result type for certwatch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the certwatch server
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network transport errors (HTTP listener, TLS handshakes)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend accessor errors
    #[error("Backend error: {0}")]
    Backend(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport(message.into())
    }

    /// Create a new backend accessor error
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }
}
