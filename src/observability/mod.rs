//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Every request:
//!     → logging.rs (access_log middleware: one structured event)
//!     → metrics.rs (request counter + latency histogram)
//! Auth stage:
//!     → metrics.rs (verification outcome counter)
//! ```
//!
//! # Design Decisions
//! - Observers only: nothing here changes a response
//! - Request ID (x-request-id) appears on every access-log line

pub mod logging;
pub mod metrics;
