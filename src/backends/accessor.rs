//! Accessor trait and backend kind enum.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::cache::CacheItem;
use crate::errors::Result;

/// Kind of certificate source backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Live TLS endpoints probed for their served certificate
    TlsEndpoint,
    /// Directory of PEM-encoded certificates on disk
    PemDirectory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TlsEndpoint => "tls_endpoint",
            Self::PemDirectory => "pem_directory",
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "tls_endpoint" => Ok(Self::TlsEndpoint),
            "pem_directory" => Ok(Self::PemDirectory),
            _ => Err(format!("Unknown backend kind: {}", s)),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for certificate source backends.
///
/// Implementations must be Send + Sync; the scheduler queries all configured
/// accessors concurrently during a refresh run and bounds each call with a
/// timeout, so `fetch_all` needs no internal deadline handling.
#[async_trait]
pub trait Accessor: Send + Sync + fmt::Debug {
    /// The configured backend name; used to namespace cache keys.
    fn name(&self) -> &str;

    /// The backend kind identifier.
    fn kind(&self) -> BackendKind;

    /// Enumerate the source's current certificate metadata.
    ///
    /// Returns the complete item set for this source, with `backend_name`
    /// already set to [`Accessor::name`]. An error means the source
    /// contributes zero items to the current run; there are no
    /// partial-result semantics.
    async fn fetch_all(&self) -> Result<Vec<CacheItem>>;
}
