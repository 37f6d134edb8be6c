//! # Certificate Source Backends
//!
//! Pluggable accessors that enumerate certificate expiration metadata from a
//! configured source. The refresh scheduler only depends on the [`Accessor`]
//! contract: a fetch either yields the source's complete current item set or
//! an error, in which case the source contributes nothing to that run.
//!
//! Two protocol-free accessors ship with the crate: [`TlsEndpointAccessor`]
//! observes the certificates live TLS endpoints actually serve, and
//! [`PemDirectoryAccessor`] scans PEM material on disk. Secret-store
//! integrations (Vault and the like) plug in through the same trait.

pub mod accessor;
pub mod certinfo;
pub mod pem_dir;
pub mod registry;
pub mod tls_endpoint;

pub use accessor::{Accessor, BackendKind};
pub use pem_dir::PemDirectoryAccessor;
pub use registry::build_accessors;
pub use tls_endpoint::TlsEndpointAccessor;
