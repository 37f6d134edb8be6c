//! Integration tests for the built-in accessors, using generated certificates.

use std::sync::Arc;
use std::time::Duration;

use rcgen::{CertificateParams, DnType, KeyPair};

use certwatch::backends::{Accessor, PemDirectoryAccessor, TlsEndpointAccessor};

/// Self-signed certificate with a fixed common name and expiry year.
fn generate_cert(common_name: &str, expiry_year: i32) -> (rcgen::Certificate, KeyPair) {
    let mut params = CertificateParams::new(vec![common_name.to_string()]).expect("params");
    params.distinguished_name.push(DnType::CommonName, common_name);
    params.not_after = rcgen::date_time_ymd(expiry_year, 1, 1);

    let key = KeyPair::generate().expect("key pair");
    let cert = params.self_signed(&key).expect("self-signed cert");
    (cert, key)
}

// Midnight UTC on Jan 1 of each year.
const EXPIRY_2026: i64 = 1_767_225_600;
const EXPIRY_2027: i64 = 1_798_761_600;
const EXPIRY_2028: i64 = 1_830_297_600;

#[tokio::test]
async fn test_pem_directory_scan() {
    let dir = tempfile::tempdir().expect("tempdir");

    let (a, _) = generate_cert("web-a.example.com", 2026);
    std::fs::write(dir.path().join("a.pem"), a.pem()).unwrap();

    // Two-certificate bundle: the second block gets a `#1` path suffix.
    let (b, _) = generate_cert("web-b.example.com", 2027);
    let (c, _) = generate_cert("web-c.example.com", 2028);
    std::fs::write(dir.path().join("bundle.crt"), format!("{}{}", b.pem(), c.pem())).unwrap();

    // Nested directories are walked; non-certificate files are skipped.
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let (d, _) = generate_cert("web-d.example.com", 2026);
    std::fs::write(dir.path().join("sub").join("nested.pem"), d.pem()).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a certificate").unwrap();

    let accessor =
        PemDirectoryAccessor::new("local-pki".to_string(), dir.path().to_path_buf());
    let mut items = accessor.fetch_all().await.expect("scan succeeds");
    items.sort_by(|x, y| x.path.cmp(&y.path));

    let paths: Vec<&str> = items.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["a.pem", "bundle.crt", "bundle.crt#1", "sub/nested.pem"]);

    assert_eq!(items[0].common_name, "web-a.example.com");
    assert_eq!(items[0].not_after.timestamp(), EXPIRY_2026);
    assert_eq!(items[1].common_name, "web-b.example.com");
    assert_eq!(items[1].not_after.timestamp(), EXPIRY_2027);
    assert_eq!(items[2].common_name, "web-c.example.com");
    assert_eq!(items[2].not_after.timestamp(), EXPIRY_2028);
    assert!(items.iter().all(|i| i.backend_name == "local-pki"));
}

#[tokio::test]
async fn test_tls_endpoint_probe() {
    let (cert, key) = generate_cert("probe.example.com", 2027);

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let server_config = rustls::ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_no_client_auth()
        .with_single_cert(
            vec![cert.der().clone()],
            rustls::pki_types::PrivateKeyDer::Pkcs8(key.serialize_der().into()),
        )
        .unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let acceptor = tokio_rustls::TlsAcceptor::from(Arc::new(server_config));
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            if let Ok(_tls) = acceptor.accept(stream).await {
                // Hold the session open long enough for the probe to finish.
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    });

    let accessor =
        TlsEndpointAccessor::new("edge".to_string(), vec![addr.to_string()]).unwrap();
    let items = accessor.fetch_all().await.expect("probe succeeds");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].backend_name, "edge");
    assert_eq!(items[0].path, addr.to_string());
    assert_eq!(items[0].common_name, "probe.example.com");
    assert_eq!(items[0].not_after.timestamp(), EXPIRY_2027);
}
