#![cfg(test)]
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_rustls::TlsAcceptor;

use tunnelproxy::adapters::{serve_plain, serve_tls, HyperProxyAdapter, TcpDialer};

pub struct TestProxyServer {
    addr: SocketAddr,
    _server_handle: JoinHandle<()>,
}

impl TestProxyServer {
    /// Plaintext ingress on an ephemeral port.
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server_handle = tokio::spawn(serve_plain(listener, Self::adapter()));

        Ok(Self {
            addr,
            _server_handle: server_handle,
        })
    }

    /// TLS ingress on an ephemeral port.
    pub async fn start_tls(acceptor: TlsAcceptor) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server_handle = tokio::spawn(serve_tls(listener, acceptor, Self::adapter()));

        Ok(Self {
            addr,
            _server_handle: server_handle,
        })
    }

    fn adapter() -> Arc<HyperProxyAdapter> {
        Arc::new(HyperProxyAdapter::new(Arc::new(TcpDialer::default())))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

/// Reads one response head byte by byte, leaving anything after it unread.
pub async fn read_head<S: AsyncRead + Unpin>(stream: &mut S) -> String {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        let n = stream.read(&mut byte).await.expect("Should be able to read response head");
        assert!(n > 0, "Connection closed before end of head: {:?}", String::from_utf8_lossy(&head));
        head.push(byte[0]);
    }
    String::from_utf8(head).expect("Response head should be UTF-8")
}
