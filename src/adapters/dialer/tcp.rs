use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::domain::{ConnectTarget, ProxyError, Result};
use crate::ports::DialerPort;

/// Direct TCP dialer with a bounded connect phase.
#[derive(Debug, Clone)]
pub struct TcpDialer {
    connect_timeout: Duration,
}

impl TcpDialer {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for TcpDialer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl DialerPort for TcpDialer {
    async fn dial(&self, target: &ConnectTarget) -> Result<TcpStream> {
        let addr = target.to_string();
        bounded_connect(&addr, self.connect_timeout, TcpStream::connect(addr.as_str())).await
    }
}

async fn bounded_connect<F>(addr: &str, limit: Duration, connect: F) -> Result<TcpStream>
where
    F: Future<Output = io::Result<TcpStream>>,
{
    match timeout(limit, connect).await {
        Ok(Ok(stream)) => {
            log::debug!("Connected to {}", addr);
            Ok(stream)
        }
        Ok(Err(e)) => {
            log::debug!("Failed to connect to {}: {}", addr, e);
            Err(ProxyError::ConnectionFailed(format!("dial tcp {}: {}", addr, e)))
        }
        Err(_) => {
            log::debug!("Timeout connecting to {}", addr);
            Err(ProxyError::Timeout(format!("dial tcp {}: i/o timeout", addr)))
        }
    }
}
