//! Request pipeline stages.
//!
//! Each stage takes the in-flight [`RequestContext`](crate::pipeline::RequestContext)
//! and either mutates it and continues, or answers the request itself.

pub mod auth;
pub mod cors;
pub mod rewrite;

pub use auth::{authenticate, bearer_token, is_public, PUBLIC_PREFIXES};
pub use cors::apply_cors;
pub use rewrite::{apply_strip_prefix, strip_path_prefix};
