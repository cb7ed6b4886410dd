use hyper::Uri;

use super::{ProxyError, Result};

const HTTP_PORT: u16 = 80;
const HTTPS_PORT: u16 = 443;

/// A `host:port` pair the proxy dials on behalf of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub host: String,
    pub port: u16,
}

impl ConnectTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Target of a CONNECT request, written in authority form (`host:port`).
    pub fn from_connect_uri(uri: &Uri) -> Result<Self> {
        let authority = uri
            .authority()
            .ok_or_else(|| ProxyError::InvalidTarget(format!("CONNECT must be to a socket address, got {}", uri)))?;

        if authority.host().is_empty() {
            return Err(ProxyError::InvalidTarget(format!("empty host in {}", uri)));
        }

        Ok(Self::new(authority.host(), authority.port_u16().unwrap_or(HTTPS_PORT)))
    }

    /// Origin of a relayed request, written in absolute form.
    pub fn from_origin_uri(uri: &Uri) -> Result<Self> {
        let host = uri
            .host()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| ProxyError::InvalidTarget(format!("missing host in {}", uri)))?;

        let default_port = match uri.scheme_str() {
            Some("https") => HTTPS_PORT,
            _ => HTTP_PORT,
        };

        Ok(Self::new(host, uri.port_u16().unwrap_or(default_port)))
    }

    /// Host without IPv6 brackets, as used for TLS server names.
    pub fn bare_host(&self) -> &str {
        self.host.trim_start_matches('[').trim_end_matches(']')
    }
}

impl std::fmt::Display for ConnectTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.host.contains(':') && !self.host.starts_with('[') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TunnelState {
    Dialing,
    Failed,
    Established,
    Pumping,
    Closed,
}

impl TunnelState {
    pub fn can_advance_to(self, next: TunnelState) -> bool {
        use TunnelState::*;

        matches!(
            (self, next),
            (Dialing, Failed) | (Dialing, Established) | (Established, Pumping) | (Established, Closed) | (Pumping, Closed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TunnelState::Failed | TunnelState::Closed)
    }
}

impl std::fmt::Display for TunnelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TunnelState::Dialing => "dialing",
            TunnelState::Failed => "failed",
            TunnelState::Established => "established",
            TunnelState::Pumping => "pumping",
            TunnelState::Closed => "closed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpDirection {
    ClientToUpstream,
    UpstreamToClient,
}

impl std::fmt::Display for PumpDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PumpDirection::ClientToUpstream => write!(f, "client->upstream"),
            PumpDirection::UpstreamToClient => write!(f, "upstream->client"),
        }
    }
}

/// Outcome of one direction of a tunnel.
#[derive(Debug, Clone)]
pub struct PumpReport {
    pub direction: PumpDirection,
    pub bytes: u64,
    pub error: Option<String>,
}

impl PumpReport {
    pub fn finished(direction: PumpDirection, bytes: u64) -> Self {
        Self {
            direction,
            bytes,
            error: None,
        }
    }

    pub fn failed(direction: PumpDirection, bytes: u64, error: impl ToString) -> Self {
        Self {
            direction,
            bytes,
            error: Some(error.to_string()),
        }
    }
}
