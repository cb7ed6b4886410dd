use crate::domain::Result;
use async_trait::async_trait;
use rustls::pki_types::{CertificateDer, PrivateKeyDer};

/// Certificate chain and private key served by the TLS ingress
pub struct TlsCredentials {
    pub cert_chain: Vec<CertificateDer<'static>>,
    pub key: PrivateKeyDer<'static>,
}

/// Port for loading the TLS ingress credentials
#[async_trait]
pub trait CredentialsPort: Send + Sync {
    async fn load(&self) -> Result<TlsCredentials>;
}
