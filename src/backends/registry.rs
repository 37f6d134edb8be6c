//! Construction of accessors from configured backend descriptors.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::backends::accessor::Accessor;
use crate::backends::pem_dir::PemDirectoryAccessor;
use crate::backends::tls_endpoint::TlsEndpointAccessor;
use crate::config::{BackendDescriptor, BackendSettings};
use crate::errors::{Error, Result};

/// Build one accessor per configured backend descriptor.
///
/// Descriptors are immutable after server start; construction failures are
/// configuration errors and abort startup. Backend names must be unique
/// because they namespace cache keys.
pub fn build_accessors(descriptors: &[BackendDescriptor]) -> Result<Vec<Arc<dyn Accessor>>> {
    let mut seen = HashSet::new();
    let mut accessors: Vec<Arc<dyn Accessor>> = Vec::with_capacity(descriptors.len());

    for descriptor in descriptors {
        if !seen.insert(descriptor.name.as_str()) {
            return Err(Error::config(format!("duplicate backend name `{}'", descriptor.name)));
        }

        info!(
            backend = %descriptor.name,
            kind = %descriptor.settings.kind(),
            "Configuring backend"
        );

        let accessor: Arc<dyn Accessor> = match &descriptor.settings {
            BackendSettings::TlsEndpoint { hosts } => {
                Arc::new(TlsEndpointAccessor::new(descriptor.name.clone(), hosts.clone())?)
            }
            BackendSettings::PemDirectory { path } => {
                Arc::new(PemDirectoryAccessor::new(descriptor.name.clone(), path.clone()))
            }
        };
        accessors.push(accessor);
    }

    Ok(accessors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::accessor::BackendKind;
    use std::path::PathBuf;

    fn pem_descriptor(name: &str) -> BackendDescriptor {
        BackendDescriptor {
            name: name.to_string(),
            settings: BackendSettings::PemDirectory { path: PathBuf::from("/etc/ssl/certs") },
        }
    }

    #[test]
    fn test_builds_one_accessor_per_descriptor() {
        let descriptors = vec![
            pem_descriptor("local-pki"),
            BackendDescriptor {
                name: "edge".to_string(),
                settings: BackendSettings::TlsEndpoint { hosts: vec!["example.com:443".into()] },
            },
        ];

        let accessors = build_accessors(&descriptors).unwrap();
        assert_eq!(accessors.len(), 2);
        assert_eq!(accessors[0].kind(), BackendKind::PemDirectory);
        assert_eq!(accessors[1].kind(), BackendKind::TlsEndpoint);
        assert_eq!(accessors[0].name(), "local-pki");
    }

    #[test]
    fn test_duplicate_backend_names_rejected() {
        let descriptors = vec![pem_descriptor("pki"), pem_descriptor("pki")];
        let err = build_accessors(&descriptors).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
