//! HTTP API gateway library.
//!
//! Authenticates inbound requests against the authorization service,
//! rewrites their routing information and forwards them to the auth or
//! notes backend, relaying the backend's response to the caller.

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod proxy;
pub mod routing;

pub use config::GatewayConfig;
pub use error::{ApiError, StartupError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::Pipeline;
