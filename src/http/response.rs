//! Responses produced by the gateway itself.
//!
//! Backend responses are relayed as-is by the forwarder; this module only
//! covers what the gateway answers locally.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;

pub const SERVICE_NAME: &str = "api-gateway";
pub const SERVICE_VERSION: &str = "1.0.0";

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Fixed liveness payload for `GET`/`HEAD /health`.
pub fn health_response() -> Response {
    let body = HealthStatus {
        status: "healthy",
        service: SERVICE_NAME,
        version: SERVICE_VERSION,
    };
    (StatusCode::OK, Json(body)).into_response()
}
