//! Client-side TLS trust for upstream connections.
//!
//! Full chain, expiry and hostname validation through rustls' WebPKI verifier.
//! The verification name is supplied per connection by the forwarder and is
//! always the logical upstream hostname.

use rustls::pki_types::CertificateDer;
use rustls::{ClientConfig, RootCertStore};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TlsConfigError {
    #[error("Failed to read CA file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("CA file '{0}' contains no certificates")]
    Empty(String),

    #[error("Rejected trust anchor: {0}")]
    InvalidCertificate(String),
}

/// Builds the shared client config: Mozilla roots plus any `extra_roots`.
pub fn client_config(
    extra_roots: Vec<CertificateDer<'static>>,
) -> Result<Arc<ClientConfig>, TlsConfigError> {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    for cert in extra_roots {
        root_store
            .add(cert)
            .map_err(|e| TlsConfigError::InvalidCertificate(e.to_string()))?;
    }

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

/// Reads every certificate from a PEM bundle.
pub fn load_ca_file(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsConfigError> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| TlsConfigError::Read {
        path: display.clone(),
        reason: e.to_string(),
    })?;

    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TlsConfigError::Read {
            path: display.clone(),
            reason: e.to_string(),
        })?;

    if certs.is_empty() {
        return Err(TlsConfigError::Empty(display));
    }
    Ok(certs)
}
