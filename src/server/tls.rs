//! TLS configuration and certificate loading.

use std::path::Path;
use std::sync::Arc;
use tokio_rustls::rustls::crypto::ring;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

use crate::error::{Error, Result};

async fn read_pem(path: &Path, what: &str) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|err| Error::Tls(format!("cannot read {what} {}: {err}", path.display())))
}

/// Load the PEM certificate chain and private key into an acceptor.
pub async fn load_tls_acceptor(cert_path: &Path, key_path: &Path) -> Result<TlsAcceptor> {
    let cert_pem = read_pem(cert_path, "certificate").await?;
    let key_pem = read_pem(key_path, "private key").await?;

    let certs: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut cert_pem.as_slice())
        .collect::<std::result::Result<_, _>>()
        .map_err(|err| Error::Tls(format!("invalid certificate {}: {err}", cert_path.display())))?;
    if certs.is_empty() {
        return Err(Error::Tls(format!(
            "no certificates found in {}",
            cert_path.display()
        )));
    }

    let key: PrivateKeyDer<'static> = rustls_pemfile::private_key(&mut key_pem.as_slice())
        .map_err(|err| Error::Tls(format!("invalid private key {}: {err}", key_path.display())))?
        .ok_or_else(|| Error::Tls(format!("no private key found in {}", key_path.display())))?;

    let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|err| Error::Tls(err.to_string()))?
        .with_no_client_auth()
        .with_single_cert(certs, key)
        .map_err(|err| Error::Tls(err.to_string()))?;

    Ok(TlsAcceptor::from(Arc::new(config)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    pub(crate) fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("src/server/testdata")
            .join(name)
    }

    #[tokio::test]
    async fn test_missing_certificate_file() {
        let dir = std::env::temp_dir();
        let Err(err) = load_tls_acceptor(
            &dir.join("revers-missing-cert.pem"),
            &dir.join("revers-missing-key.pem"),
        )
        .await
        else {
            panic!("missing certificate must fail");
        };
        assert!(matches!(err, Error::Tls(msg) if msg.contains("certificate")));
    }

    #[tokio::test]
    async fn test_empty_pem_is_rejected() {
        let dir = std::env::temp_dir().join(format!("revers-tls-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("cert.pem"), "").unwrap();
        std::fs::write(dir.join("key.pem"), "").unwrap();

        let Err(err) = load_tls_acceptor(&dir.join("cert.pem"), &dir.join("key.pem")).await else {
            panic!("empty PEM must fail");
        };
        assert!(matches!(err, Error::Tls(msg) if msg.contains("no certificates")));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_valid_pair_loads() {
        let result = load_tls_acceptor(&fixture("cert.pem"), &fixture("key.pem")).await;
        assert!(result.is_ok(), "{:?}", result.err());
    }

    #[tokio::test]
    async fn test_key_in_place_of_certificate() {
        let Err(err) = load_tls_acceptor(&fixture("key.pem"), &fixture("key.pem")).await else {
            panic!("a key file holds no certificates");
        };
        assert!(matches!(err, Error::Tls(msg) if msg.contains("no certificates")));
    }
}
