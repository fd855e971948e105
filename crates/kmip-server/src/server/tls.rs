//! Listener-side TLS configuration.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use kmip::tls::{load_certificates, load_private_key};
use tokio_rustls::rustls::server::WebPkiClientVerifier;
use tokio_rustls::rustls::{RootCertStore, ServerConfig};
use tokio_rustls::TlsAcceptor;

/// TLS material for the listener. Clients are verified against the CA
/// bundle at `ca_path` unless `require_client_auth` is cleared.
#[derive(Debug, Clone)]
pub struct TlsOptions {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub ca_path: PathBuf,
    pub require_client_auth: bool,
}

impl TlsOptions {
    /// Builds the acceptor, loading and validating all PEM material. Called
    /// before the listener binds so misconfiguration fails startup.
    pub fn acceptor(&self) -> Result<TlsAcceptor> {
        let certs = load_certificates(&self.cert_path)?;
        let key = load_private_key(&self.key_path)?;

        let builder = if self.require_client_auth {
            let mut roots = RootCertStore::empty();
            for cert in load_certificates(&self.ca_path)? {
                roots.add(cert).context("add client CA certificate")?;
            }
            let verifier = WebPkiClientVerifier::builder(Arc::new(roots))
                .build()
                .map_err(|e| anyhow!("build client verifier: {e}"))?;
            ServerConfig::builder().with_client_cert_verifier(verifier)
        } else {
            ServerConfig::builder().with_no_client_auth()
        };

        let config = builder
            .with_single_cert(certs, key)
            .context("server certificate/key mismatch")?;
        Ok(TlsAcceptor::from(Arc::new(config)))
    }
}
