//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Emit one access-log event per request
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured level
//! - JSON format for production, pretty format for development
//! - Health probes log at debug so they don't drown real traffic

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::observability::metrics;
use crate::pipeline::MatchedRoute;

/// Path whose access-log lines are demoted to debug.
const QUIET_PATH: &str = "/health";

/// Install the global subscriber. Call once, from `main`.
pub fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("api_gateway={0},tower_http={0}", config.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Passive access log: observes, never alters, the response.
pub async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let target = match request.uri().query() {
        Some(query) => format!("{path}?{query}"),
        None => path.clone(),
    };
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();
    let route = response
        .extensions()
        .get::<MatchedRoute>()
        .map(|MatchedRoute(pattern)| pattern.as_str())
        .unwrap_or("none");

    metrics::record_request(method.as_str(), status, route, latency);

    if path == QUIET_PATH {
        tracing::debug!(request_id = %request_id, method = %method, target = %target, status, ?latency, "Request served");
    } else {
        tracing::info!(request_id = %request_id, method = %method, target = %target, route, status, ?latency, "Request served");
    }

    response
}
