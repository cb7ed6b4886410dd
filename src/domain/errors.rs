use std::fmt;

use hyper::StatusCode;

#[derive(Debug, Clone)]
pub enum ProxyError {
    InvalidTarget(String),
    ConnectionFailed(String),
    Timeout(String),
    HijackUnsupported,
    UpgradeFailed(String),
    Credentials(String),
}

impl fmt::Display for ProxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyError::InvalidTarget(msg) => write!(f, "Invalid target: {}", msg),
            ProxyError::ConnectionFailed(msg) => write!(f, "{}", msg),
            ProxyError::Timeout(msg) => write!(f, "{}", msg),
            ProxyError::HijackUnsupported => write!(f, "Hijacking not supported"),
            ProxyError::UpgradeFailed(msg) => write!(f, "Connection takeover failed: {}", msg),
            ProxyError::Credentials(msg) => write!(f, "TLS credentials: {}", msg),
        }
    }
}

impl std::error::Error for ProxyError {}

impl ProxyError {
    /// Status code answered to the client when this error ends a request.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ProxyError::ConnectionFailed(_) | ProxyError::Timeout(_) | ProxyError::UpgradeFailed(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ProxyError::HijackUnsupported | ProxyError::Credentials(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProxyError>;
