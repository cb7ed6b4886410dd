pub mod credentials;
pub mod dialer;
pub mod hyper_server;

pub use credentials::PemFileCredentials;
pub use dialer::TcpDialer;
pub use hyper_server::{bind, run_ingresses, run_plain, serve_plain, serve_tls, tls_acceptor, HyperProxyAdapter};
