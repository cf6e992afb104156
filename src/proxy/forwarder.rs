//! Streaming reverse-proxy forwarder.
//!
//! # Responsibilities
//! - Point the request at the backend (scheme, authority, Host, path)
//! - Stream the request body out and the response body back
//! - Map connection failures, broken responses and slow backends to [`ForwardError`]
//!
//! # Design Decisions
//! - Bodies are never buffered; hyper pulls frames as they arrive
//! - Status and headers come back as the backend sent them, minus hop-by-hop
//! - No retries: one attempt, failure surfaces immediately

use std::time::Duration;

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    response::Response,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::TimeoutConfig;
use crate::pipeline::RequestContext;
use crate::proxy::headers::{append_forwarded_for, strip_hop_by_hop};
use crate::proxy::BackendTarget;

#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream sent no response within {0:?}")]
    Timeout(Duration),
}

/// Sends requests to backends over a shared connection pool.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    /// Bound on receiving the backend's response head.
    response_timeout: Duration,
}

impl Forwarder {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_millis(timeouts.connect_ms)));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self {
            client,
            response_timeout: Duration::from_millis(timeouts.request_ms),
        }
    }

    /// Forward the request held by `ctx` to `target`.
    ///
    /// Consumes the context's headers and body.
    pub async fn forward(
        &self,
        target: &BackendTarget,
        ctx: &mut RequestContext,
    ) -> Result<Response, ForwardError> {
        let uri = target.uri_for(ctx.path(), ctx.query())?;

        let mut headers = std::mem::take(ctx.headers_mut());
        let host = HeaderValue::from_str(target.backend().authority().as_str())
            .map_err(axum::http::Error::from)?;
        headers.insert(header::HOST, host);
        if let Some(peer) = ctx.peer() {
            append_forwarded_for(&mut headers, peer.ip());
        }

        tracing::debug!(method = %ctx.method(), upstream = %uri, "Forwarding request");

        let mut request = Request::builder()
            .method(ctx.method().clone())
            .uri(uri)
            .body(ctx.take_body())?;
        *request.headers_mut() = headers;

        let response = tokio::time::timeout(self.response_timeout, self.client.request(request))
            .await
            .map_err(|_| ForwardError::Timeout(self.response_timeout))??;
        Ok(relay(response))
    }
}

/// Hand the backend's response to the caller, body still streaming.
fn relay(response: hyper::Response<Incoming>) -> Response {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
