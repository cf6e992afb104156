//! Stage identifiers and the continue/abort signal.

use std::fmt;

use axum::response::Response;

/// One unit of the middleware chain, as registered on a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// Attach CORS headers; answer preflights with 204.
    Cors,
    /// Verify the bearer token and inject identity headers.
    Authenticate,
    /// Remove a literal prefix from the request path.
    StripPrefix(String),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Cors => f.write_str("cors"),
            Stage::Authenticate => f.write_str("authenticate"),
            Stage::StripPrefix(prefix) => write!(f, "strip_prefix({prefix})"),
        }
    }
}

/// What a stage tells the driver.
#[derive(Debug)]
pub enum Flow {
    /// Run the next stage (or the route target).
    Continue,
    /// Stop here and send this response.
    Respond(Response),
}

impl Flow {
    pub fn is_continue(&self) -> bool {
        matches!(self, Flow::Continue)
    }
}
