use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tunnelproxy::adapters::{run_ingresses, tls_acceptor, HyperProxyAdapter, PemFileCredentials, TcpDialer};
use tunnelproxy::config::{Opts, ProxyConfig};
use tunnelproxy::ports::{CredentialsPort, DialerPort};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ProxyConfig::from(Opts::parse());
    info!("tunnelproxy {} starting", env!("TUNNELPROXY_VERSION"));

    let dialer: Arc<dyn DialerPort> = Arc::new(TcpDialer::new(config.dial_timeout));
    let adapter = Arc::new(HyperProxyAdapter::new(dialer));

    let credentials = PemFileCredentials::new(&config.cert_path, &config.key_path)
        .load()
        .await?;
    let acceptor = tls_acceptor(credentials)?;

    run_ingresses(config.http_addr, config.tls_addr, acceptor, adapter).await?;

    Ok(())
}
