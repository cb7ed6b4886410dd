use hyper::upgrade::{OnUpgrade, Upgraded};
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::TcpStream;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::body::{empty, error_response, Body};
use super::pump::{pump, Teardown};
use crate::domain::{ConnectTarget, ProxyError, PumpDirection, Result, TunnelState};
use crate::ports::DialerPort;

/// Takeover capability of the client connection behind a CONNECT request.
///
/// It can be claimed once from a request and consumed once; afterwards the
/// connection carries raw bytes only.
pub struct Hijack {
    on_upgrade: OnUpgrade,
}

impl Hijack {
    /// Returns `None` when the serving connection cannot be taken over.
    pub fn claim<B>(req: &mut Request<B>) -> Option<Self> {
        req.extensions_mut()
            .remove::<OnUpgrade>()
            .map(|on_upgrade| Hijack { on_upgrade })
    }

    /// Resolves once the response head has been flushed to the client.
    pub async fn into_raw(self) -> Result<TokioIo<Upgraded>> {
        self.on_upgrade
            .await
            .map(TokioIo::new)
            .map_err(|e| ProxyError::UpgradeFailed(e.to_string()))
    }
}

pub struct TunnelEstablisher {
    dialer: Arc<dyn DialerPort>,
}

impl TunnelEstablisher {
    pub fn new(dialer: Arc<dyn DialerPort>) -> Self {
        Self { dialer }
    }

    /// Dials the CONNECT target, then answers with a bare 200 and hands the
    /// client connection to two pumps once hyper releases it.
    pub async fn establish<B>(&self, req: Request<B>) -> Response<Body> {
        let span = info_span!("tunnel", id = %Uuid::new_v4(), target = %req.uri());
        self.establish_inner(req).instrument(span).await
    }

    async fn establish_inner<B>(&self, mut req: Request<B>) -> Response<Body> {
        let target = match ConnectTarget::from_connect_uri(req.uri()) {
            Ok(target) => target,
            Err(e) => {
                warn!("Rejecting CONNECT: {}", e);
                return error_response(e.status(), e);
            }
        };

        let mut state = TunnelState::Dialing;
        let upstream = match self.dialer.dial(&target).await {
            Ok(stream) => stream,
            Err(e) => {
                advance(&mut state, TunnelState::Failed);
                warn!("CONNECT {} failed: {}", target, e);
                return error_response(e.status(), e);
            }
        };

        let hijack = match Hijack::claim(&mut req) {
            Some(hijack) => hijack,
            None => {
                let e = ProxyError::HijackUnsupported;
                error!("CONNECT {}: {}", target, e);
                return error_response(e.status(), e);
            }
        };

        advance(&mut state, TunnelState::Established);
        info!("CONNECT {} established", target);
        tokio::spawn(run_tunnel(state, hijack, upstream).in_current_span());

        Response::new(empty())
    }
}

async fn run_tunnel(mut state: TunnelState, hijack: Hijack, upstream: TcpStream) {
    let client = match hijack.into_raw().await {
        Ok(client) => client,
        Err(e) => {
            warn!("{}", e);
            advance(&mut state, TunnelState::Closed);
            return;
        }
    };

    let (client_read, client_write) = tokio::io::split(client);
    let (upstream_read, upstream_write) = upstream.into_split();

    advance(&mut state, TunnelState::Pumping);
    let teardown = Arc::new(Teardown::new());
    let outbound = tokio::spawn(
        pump(client_read, upstream_write, PumpDirection::ClientToUpstream, teardown.clone()).in_current_span(),
    );
    let inbound = tokio::spawn(
        pump(upstream_read, client_write, PumpDirection::UpstreamToClient, teardown).in_current_span(),
    );

    // Only observes the pumps; they stop each other through the teardown.
    let (outbound, inbound) = (outbound.await, inbound.await);
    if let (Ok(outbound), Ok(inbound)) = (outbound, inbound) {
        debug!("sent {} bytes, received {} bytes", outbound.bytes, inbound.bytes);
    }
    advance(&mut state, TunnelState::Closed);
}

fn advance(state: &mut TunnelState, next: TunnelState) {
    debug_assert!(state.can_advance_to(next), "{} -> {}", state, next);
    debug!("{} -> {}", state, next);
    *state = next;
}
