mod adapter;
mod body;
mod connection;
mod connector;
mod forwarder;
mod frontend;
mod pump;
mod tunnel;

pub use adapter::HyperProxyAdapter;
pub use body::{empty, error_response, full, Body};
pub use connection::OriginStream;
pub use connector::DialConnector;
pub use forwarder::{copy_headers, HttpForwarder};
pub use frontend::{bind, run_ingresses, run_plain, serve_connection, serve_plain, serve_tls, tls_acceptor};
pub use pump::{pump, Teardown};
pub use tunnel::{Hijack, TunnelEstablisher};
