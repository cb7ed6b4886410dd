use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use rustls::ServerConfig;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing::{debug, error, info, warn};

use super::adapter::HyperProxyAdapter;
use crate::domain::{ProxyError, Result};
use crate::ports::TlsCredentials;

/// TLS acceptor for the TLS ingress, restricted to HTTP/1.1.
pub fn tls_acceptor(credentials: TlsCredentials) -> Result<TlsAcceptor> {
    let mut config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(credentials.cert_chain, credentials.key)
        .map_err(|e| ProxyError::Credentials(e.to_string()))?;
    config.alpn_protocols = vec![b"http/1.1".to_vec()];

    Ok(TlsAcceptor::from(Arc::new(config)))
}

/// Accepts plaintext connections forever, one task per connection.
pub async fn serve_plain(listener: TcpListener, adapter: Arc<HyperProxyAdapter>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                debug!("Accepted {}", peer);
                tokio::spawn(serve_connection(stream, adapter.clone()));
            }
            Err(e) => warn!("Accept failed: {}", e),
        }
    }
}

/// Accepts connections forever and terminates TLS before serving them.
pub async fn serve_tls(listener: TcpListener, acceptor: TlsAcceptor, adapter: Arc<HyperProxyAdapter>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let acceptor = acceptor.clone();
                let adapter = adapter.clone();

                tokio::spawn(async move {
                    match acceptor.accept(stream).await {
                        Ok(stream) => {
                            debug!("TLS session with {}", peer);
                            serve_connection(stream, adapter).await
                        }
                        Err(e) => debug!("TLS handshake with {} failed: {}", peer, e),
                    }
                });
            }
            Err(e) => warn!("Accept failed: {}", e),
        }
    }
}

/// Serves HTTP/1.1 requests of one connection; upgrades stay enabled so CONNECT can take it over.
pub async fn serve_connection<I>(io: I, adapter: Arc<HyperProxyAdapter>)
where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let service = service_fn(move |req| {
        let adapter = adapter.clone();
        async move { Ok::<_, hyper::Error>(adapter.handle(req).await) }
    });

    if let Err(err) = http1::Builder::new()
        .preserve_header_case(true)
        .title_case_headers(true)
        .serve_connection(TokioIo::new(io), service)
        .with_upgrades()
        .await
    {
        debug!("Connection ended: {}", err);
    }
}

pub async fn bind(addr: SocketAddr, name: &str) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!("{} ingress listening on {}", name, listener.local_addr()?);
    Ok(listener)
}

/// Binds and serves the plaintext ingress. A bind failure only loses this ingress.
pub async fn run_plain(addr: SocketAddr, adapter: Arc<HyperProxyAdapter>) {
    match bind(addr, "plaintext").await {
        Ok(listener) => serve_plain(listener, adapter).await,
        Err(e) => error!("Plaintext ingress on {} unavailable: {}", addr, e),
    }
}

/// Starts both ingresses. The plaintext one runs in the background; only a
/// failure to bind the TLS ingress is returned.
pub async fn run_ingresses(
    http_addr: SocketAddr,
    tls_addr: SocketAddr,
    acceptor: TlsAcceptor,
    adapter: Arc<HyperProxyAdapter>,
) -> io::Result<()> {
    tokio::spawn(run_plain(http_addr, adapter.clone()));

    let listener = bind(tls_addr, "TLS").await?;
    serve_tls(listener, acceptor, adapter).await;
    Ok(())
}
