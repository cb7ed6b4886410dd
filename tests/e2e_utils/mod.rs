#![cfg(test)]
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod origin;
pub mod proxy_server;

pub use origin::{closed_port, HttpOrigin, TcpDestination};
pub use proxy_server::{read_head, TestProxyServer};
