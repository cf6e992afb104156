//! Reverse-proxy subsystem.
//!
//! # Data Flow
//! ```text
//! RequestContext (after stages) + BackendTarget
//!     → target.rs (scheme, authority, path, query)
//!     → headers.rs (Host, X-Forwarded-For)
//!     → forwarder.rs (hyper client, streamed both ways)
//!     → backend response relayed to the caller
//! ```

pub mod forwarder;
pub mod headers;
pub mod target;

pub use forwarder::{ForwardError, Forwarder};
pub use headers::{append_forwarded_for, strip_hop_by_hop, X_FORWARDED_FOR};
pub use target::{Backend, BackendTarget, InvalidBackend, TargetPath};
