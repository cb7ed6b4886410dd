use clap::Parser;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version = env!("TUNNELPROXY_VERSION"), author = env!("CARGO_PKG_AUTHORS"))]
pub struct Opts {
    /// path to pem file
    #[arg(long, default_value = "./tls/cert.pem")]
    pub pem: PathBuf,

    /// path to key file
    #[arg(long, default_value = "./tls/key.pem")]
    pub key: PathBuf,
}

/// Startup configuration, built once and handed to the ingress setup.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub http_addr: SocketAddr,
    pub tls_addr: SocketAddr,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub dial_timeout: Duration,
}

impl ProxyConfig {
    pub const HTTP_PORT: u16 = 8080;
    pub const TLS_PORT: u16 = 8888;
    pub const DIAL_TIMEOUT: Duration = Duration::from_secs(10);
}

impl From<Opts> for ProxyConfig {
    fn from(opts: Opts) -> Self {
        Self {
            http_addr: (Ipv4Addr::UNSPECIFIED, Self::HTTP_PORT).into(),
            tls_addr: (Ipv4Addr::UNSPECIFIED, Self::TLS_PORT).into(),
            cert_path: opts.pem,
            key_path: opts.key,
            dial_timeout: Self::DIAL_TIMEOUT,
        }
    }
}
