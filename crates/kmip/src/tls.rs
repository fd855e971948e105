//! PEM loading shared by the server acceptor and the client connector.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

/// Loads every certificate from a PEM bundle. At least one is required.
pub fn load_certificates(path: &Path) -> Result<Vec<CertificateDer<'static>>> {
    let file = File::open(path)
        .with_context(|| format!("open certificate file {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let certs = CertificateDer::pem_reader_iter(&mut reader)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow!("parse certificates in {}: {e}", path.display()))?;
    if certs.is_empty() {
        return Err(anyhow!("no certificates found in {}", path.display()));
    }
    Ok(certs)
}

/// Loads the first PEM private key (PKCS#1, PKCS#8 or SEC1).
pub fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>> {
    PrivateKeyDer::from_pem_file(path)
        .map_err(|e| anyhow!("parse private key in {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_certificate_file() {
        let res = load_certificates(Path::new("/nonexistent/server.crt"));
        assert!(res.is_err());
    }

    #[test]
    fn test_garbage_pem_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not a certificate").unwrap();
        assert!(load_certificates(file.path()).is_err());
        assert!(load_private_key(file.path()).is_err());
    }
}
