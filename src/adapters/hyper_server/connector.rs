use futures::Future;
use hyper::Uri;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio_rustls::TlsConnector;
use tower_service::Service;

use super::connection::OriginStream;
use crate::domain::{ConnectTarget, ProxyError};
use crate::ports::DialerPort;

/// Hands origin connections to the outbound HTTP client, opened through the dialer.
#[derive(Clone)]
pub struct DialConnector {
    dialer: Arc<dyn DialerPort>,
    tls: TlsConnector,
}

impl DialConnector {
    pub fn new(dialer: Arc<dyn DialerPort>) -> Self {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let mut config = ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        config.alpn_protocols = vec![b"http/1.1".to_vec()];

        Self {
            dialer,
            tls: TlsConnector::from(Arc::new(config)),
        }
    }
}

impl Service<Uri> for DialConnector {
    type Response = OriginStream;
    type Error = ProxyError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, uri: Uri) -> Self::Future {
        let dialer = self.dialer.clone();
        let tls = self.tls.clone();

        Box::pin(async move {
            let target = ConnectTarget::from_origin_uri(&uri)?;
            let stream = dialer.dial(&target).await?;

            if uri.scheme_str() != Some("https") {
                return Ok(OriginStream::from(stream));
            }

            let server_name = ServerName::try_from(target.bare_host().to_string())
                .map_err(|e| ProxyError::InvalidTarget(format!("{}: {}", target.host, e)))?;
            let stream = tls
                .connect(server_name, stream)
                .await
                .map_err(|e| ProxyError::ConnectionFailed(format!("tls handshake with {}: {}", target, e)))?;

            Ok(OriginStream::from(stream))
        })
    }
}
