use crate::domain::{ConnectTarget, Result};
use async_trait::async_trait;
use tokio::net::TcpStream;

/// Port for opening outbound TCP connections
#[async_trait]
pub trait DialerPort: Send + Sync {
    /// Open a connection to the target, bounded by the dialer's connect timeout
    async fn dial(&self, target: &ConnectTarget) -> Result<TcpStream>;
}
