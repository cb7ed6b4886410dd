use http_body_util::BodyExt;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::sync::Arc;

use super::body::Body;
use super::connector::DialConnector;
use super::forwarder::HttpForwarder;
use super::tunnel::TunnelEstablisher;
use crate::domain::{route_for, Route};
use crate::ports::DialerPort;

/// Entry point of every request accepted by a frontend.
pub struct HyperProxyAdapter {
    forwarder: HttpForwarder,
    establisher: TunnelEstablisher,
}

impl HyperProxyAdapter {
    pub fn new(dialer: Arc<dyn DialerPort>) -> Self {
        Self {
            forwarder: HttpForwarder::new(DialConnector::new(dialer.clone())),
            establisher: TunnelEstablisher::new(dialer),
        }
    }

    pub async fn handle<B>(&self, req: Request<B>) -> Response<Body>
    where
        B: hyper::body::Body<Data = Bytes, Error = hyper::Error> + Send + Sync + 'static,
    {
        match route_for(req.method()) {
            Route::Tunnel => self.establisher.establish(req).await,
            Route::Forward => self.forwarder.forward(req.map(|body| body.boxed())).await,
        }
    }
}
