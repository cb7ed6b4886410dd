use hyper::Method;

/// Path a request takes through the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Raw byte tunnel to the CONNECT target.
    Tunnel,
    /// HTTP relay to the origin named by the request target.
    Forward,
}

pub fn route_for(method: &Method) -> Route {
    if method == Method::CONNECT {
        Route::Tunnel
    } else {
        Route::Forward
    }
}
