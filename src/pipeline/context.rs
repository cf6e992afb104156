//! Per-request state threaded through the stages.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Method, Request},
};

/// Mutable state of one in-flight request.
///
/// Owned by the driver for the lifetime of the request; stages borrow it
/// mutably, one at a time, in route order.
#[derive(Debug)]
pub struct RequestContext {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Body,
    peer: Option<SocketAddr>,
    /// Headers every response for this request must carry (CORS).
    response_headers: HeaderMap,
}

impl RequestContext {
    pub fn from_request(request: Request<Body>) -> Self {
        let (parts, body) = request.into_parts();
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            headers: parts.headers,
            body,
            peer,
            response_headers: HeaderMap::new(),
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Hand the body to the forwarder. Leaves an empty body behind.
    pub fn take_body(&mut self) -> Body {
        std::mem::take(&mut self.body)
    }

    pub fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.response_headers
    }

    /// Add the accumulated response headers without clobbering ones already set.
    pub fn decorate_response(&self, headers: &mut HeaderMap) {
        for (name, value) in &self.response_headers {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }
    }
}
