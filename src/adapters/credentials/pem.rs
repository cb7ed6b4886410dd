use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::{ProxyError, Result};
use crate::ports::{CredentialsPort, TlsCredentials};

/// Loads the TLS ingress certificate chain and private key from PEM files.
#[derive(Debug, Clone)]
pub struct PemFileCredentials {
    cert_path: PathBuf,
    key_path: PathBuf,
}

impl PemFileCredentials {
    pub fn new(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_path: cert_path.into(),
            key_path: key_path.into(),
        }
    }

    async fn read(path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| ProxyError::Credentials(format!("open {}: {}", path.display(), e)))
    }
}

#[async_trait]
impl CredentialsPort for PemFileCredentials {
    async fn load(&self) -> Result<TlsCredentials> {
        let cert_pem = Self::read(&self.cert_path).await?;
        let key_pem = Self::read(&self.key_path).await?;

        let mut reader = cert_pem.as_slice();
        let cert_chain = rustls_pemfile::certs(&mut reader)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| ProxyError::Credentials(format!("parse {}: {}", self.cert_path.display(), e)))?;
        if cert_chain.is_empty() {
            return Err(ProxyError::Credentials(format!(
                "no certificate found in {}",
                self.cert_path.display()
            )));
        }

        let mut reader = key_pem.as_slice();
        let key = rustls_pemfile::private_key(&mut reader)
            .map_err(|e| ProxyError::Credentials(format!("parse {}: {}", self.key_path.display(), e)))?
            .ok_or_else(|| ProxyError::Credentials(format!("no private key found in {}", self.key_path.display())))?;

        log::debug!(
            "Loaded {} certificate(s) from {}",
            cert_chain.len(),
            self.cert_path.display()
        );
        Ok(TlsCredentials { cert_chain, key })
    }
}
