//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, access log)
//!     → pipeline (stages from middleware/, route table, forwarder)
//!     → response.rs (locally answered requests)
//!     → Send to client
//! ```

pub mod middleware;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
