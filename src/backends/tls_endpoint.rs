//! Accessor that probes live TLS endpoints for the certificate they serve.

use std::sync::Arc;

use async_trait::async_trait;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

use crate::backends::accessor::{Accessor, BackendKind};
use crate::backends::certinfo;
use crate::cache::CacheItem;
use crate::errors::{Error, Result};

/// Enumerates certificate expiry by completing a TLS handshake against each
/// configured `host:port` and reading the presented leaf certificate.
///
/// Verification is disabled: the accessor must observe expiry even for
/// certificates no verifier would admit.
pub struct TlsEndpointAccessor {
    name: String,
    hosts: Vec<String>,
    connector: TlsConnector,
}

impl std::fmt::Debug for TlsEndpointAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsEndpointAccessor")
            .field("name", &self.name)
            .field("hosts", &self.hosts)
            .finish_non_exhaustive()
    }
}

impl TlsEndpointAccessor {
    pub fn new(name: String, hosts: Vec<String>) -> Result<Self> {
        let provider = rustls::crypto::ring::default_provider();
        let config = rustls::ClientConfig::builder_with_provider(Arc::new(provider.clone()))
            .with_safe_default_protocol_versions()
            .map_err(|err| Error::config(format!("Invalid TLS protocol configuration: {}", err)))?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(danger::ExpiryProbeVerifier::new(provider)))
            .with_no_client_auth();

        Ok(Self { name, hosts, connector: TlsConnector::from(Arc::new(config)) })
    }

    async fn probe(&self, host: &str) -> Result<CacheItem> {
        let server_name = server_name_for(host)?;

        let tcp = TcpStream::connect(host)
            .await
            .map_err(|err| Error::backend(format!("{}: connect failed: {}", host, err)))?;
        let tls = self
            .connector
            .connect(server_name, tcp)
            .await
            .map_err(|err| Error::backend(format!("{}: TLS handshake failed: {}", host, err)))?;

        let (_, session) = tls.get_ref();
        let leaf = session
            .peer_certificates()
            .and_then(|certs| certs.first())
            .ok_or_else(|| Error::backend(format!("{}: server presented no certificate", host)))?;

        let meta = certinfo::from_der(leaf.as_ref())?;
        debug!(
            backend = %self.name,
            host = %host,
            common_name = %meta.common_name,
            not_after = %meta.not_after,
            "Probed TLS endpoint"
        );

        Ok(CacheItem {
            backend_name: self.name.clone(),
            path: host.to_string(),
            common_name: meta.common_name,
            not_after: meta.not_after,
        })
    }
}

#[async_trait]
impl Accessor for TlsEndpointAccessor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> BackendKind {
        BackendKind::TlsEndpoint
    }

    async fn fetch_all(&self) -> Result<Vec<CacheItem>> {
        let probes = self.hosts.iter().map(|host| self.probe(host));
        futures::future::try_join_all(probes).await
    }
}

/// Derive the SNI name from a configured `host:port` entry.
fn server_name_for(host: &str) -> Result<ServerName<'static>> {
    let name = match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => name,
        _ => host,
    };
    let name = name.trim_start_matches('[').trim_end_matches(']');

    ServerName::try_from(name.to_string())
        .map_err(|err| Error::config(format!("invalid endpoint host `{}': {}", host, err)))
}

mod danger {
    use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
    use rustls::crypto::CryptoProvider;
    use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
    use rustls::{DigitallySignedStruct, SignatureScheme};

    /// Accepts every server certificate so the handshake always surfaces one.
    #[derive(Debug)]
    pub(super) struct ExpiryProbeVerifier {
        provider: CryptoProvider,
    }

    impl ExpiryProbeVerifier {
        pub(super) fn new(provider: CryptoProvider) -> Self {
            Self { provider }
        }
    }

    impl ServerCertVerifier for ExpiryProbeVerifier {
        fn verify_server_cert(
            &self,
            _end_entity: &CertificateDer<'_>,
            _intermediates: &[CertificateDer<'_>],
            _server_name: &ServerName<'_>,
            _ocsp_response: &[u8],
            _now: UnixTime,
        ) -> std::result::Result<ServerCertVerified, rustls::Error> {
            Ok(ServerCertVerified::assertion())
        }

        fn verify_tls12_signature(
            &self,
            _message: &[u8],
            _cert: &CertificateDer<'_>,
            _dss: &DigitallySignedStruct,
        ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
            Ok(HandshakeSignatureValid::assertion())
        }

        fn verify_tls13_signature(
            &self,
            _message: &[u8],
            _cert: &CertificateDer<'_>,
            _dss: &DigitallySignedStruct,
        ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
            Ok(HandshakeSignatureValid::assertion())
        }

        fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
            self.provider.signature_verification_algorithms.supported_schemes()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_name_strips_port() {
        assert!(server_name_for("example.com:443").is_ok());
        assert!(server_name_for("10.0.0.1:8443").is_ok());
        assert!(server_name_for("[::1]:443").is_ok());
    }

    #[test]
    fn test_server_name_without_port() {
        assert!(server_name_for("example.com").is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_backend_error() {
        // Grab a local port with nothing listening on it.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let accessor = TlsEndpointAccessor::new(
            "edge".to_string(),
            vec![format!("127.0.0.1:{}", port)],
        )
        .unwrap();

        let err = accessor.fetch_all().await.unwrap_err();
        assert!(matches!(err, Error::Backend(_)));
    }
}
