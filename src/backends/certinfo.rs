//! Expiry metadata extraction from X.509 certificates.

use chrono::{DateTime, Utc};
use x509_parser::prelude::*;

use crate::errors::{Error, Result};

/// The fields certwatch tracks about one certificate.
#[derive(Debug, Clone)]
pub struct CertMetadata {
    pub common_name: String,
    pub not_after: DateTime<Utc>,
}

/// Extract tracked metadata from a DER-encoded certificate.
pub fn from_der(der: &[u8]) -> Result<CertMetadata> {
    let (_, cert) = X509Certificate::from_der(der)
        .map_err(|err| Error::backend(format!("failed to parse certificate: {}", err)))?;
    from_cert(&cert)
}

/// Extract tracked metadata from an already-parsed certificate.
pub fn from_cert(cert: &X509Certificate<'_>) -> Result<CertMetadata> {
    // Certificates without a CN (SAN-only) fall back to the full subject DN
    // so the item is still identifiable in the cache.
    let common_name = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| cert.subject().to_string());

    let seconds = cert.validity().not_after.timestamp();
    let not_after = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
        Error::backend(format!("certificate notAfter out of range: {}", seconds))
    })?;

    Ok(CertMetadata { common_name, not_after })
}
