//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → table.rs (route lookup)
//!     → pattern.rs (evaluate path patterns)
//!     → Return: matched RouteEntry or NoMatch
//!
//! Route Compilation (at startup):
//!     routes.rs registrations
//!     → parse patterns
//!     → reject same-shape duplicates
//!     → freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: most specific pattern wins

pub mod pattern;
pub mod routes;
pub mod table;

use axum::http::Method;
use thiserror::Error;

pub use pattern::PathPattern;
pub use routes::{gateway_routes, NOTES_PREFIX};
pub use table::{RouteEntry, RouteTable, RouteTableBuilder, Target};

/// Errors raised while building a route table.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("{method} {conflicting} matches the same paths as {method} {existing}")]
    Ambiguous {
        method: Method,
        existing: String,
        conflicting: String,
    },
}
