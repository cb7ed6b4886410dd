use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::header::HeaderMap;
use hyper::{Request, Response, StatusCode};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, warn};

use super::body::{error_response, Body};
use super::connector::DialConnector;

/// Relays plain HTTP requests to their origin and streams the answer back.
pub struct HttpForwarder {
    client: Client<DialConnector, Body>,
}

impl HttpForwarder {
    pub fn new(connector: DialConnector) -> Self {
        let client = Client::builder(TokioExecutor::new())
            .http1_title_case_headers(true)
            .http1_preserve_header_case(true)
            .build(connector);

        Self { client }
    }

    pub async fn forward(&self, req: Request<Body>) -> Response<Body> {
        let method = req.method().clone();
        let uri = req.uri().clone();

        match self.client.request(req).await {
            Ok(origin) => {
                debug!("{} {} -> {}", method, uri, origin.status());
                relay_response(origin)
            }
            Err(e) => {
                let msg = error_chain(&e);
                warn!("{} {} failed: {}", method, uri, msg);
                error_response(StatusCode::SERVICE_UNAVAILABLE, msg)
            }
        }
    }
}

/// Builds the client response from the origin one; the body is streamed as-is and a
/// failure while streaming just ends the client connection.
fn relay_response(origin: Response<Incoming>) -> Response<Body> {
    let (parts, body) = origin.into_parts();

    let mut response = Response::new(body.boxed());
    copy_headers(response.headers_mut(), &parts.headers);
    *response.status_mut() = parts.status;
    response
}

/// Appends every value of every header of `src` to `dst`, keeping per-key order.
pub fn copy_headers(dst: &mut HeaderMap, src: &HeaderMap) {
    for key in src.keys() {
        for value in src.get_all(key) {
            dst.append(key.clone(), value.clone());
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
