//! Backend target descriptors.
//!
//! A [`Backend`] is the scheme + authority of a service; a [`BackendTarget`]
//! adds how the outbound path is chosen for one route.

use axum::http::uri::{Authority, PathAndQuery, Scheme, Uri};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid backend URL {url:?}: {reason}")]
pub struct InvalidBackend {
    pub url: String,
    pub reason: String,
}

/// Scheme and authority of a backend service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    scheme: Scheme,
    authority: Authority,
}

impl Backend {
    /// Parse a base URL such as `http://notes:8200`. Any path is ignored.
    pub fn parse(url: &str) -> Result<Self, InvalidBackend> {
        let invalid = |reason: String| InvalidBackend {
            url: url.to_string(),
            reason,
        };

        let uri: Uri = url.parse().map_err(|e: axum::http::uri::InvalidUri| invalid(e.to_string()))?;
        let scheme = uri
            .scheme()
            .cloned()
            .ok_or_else(|| invalid("missing scheme".to_string()))?;
        let authority = uri
            .authority()
            .cloned()
            .ok_or_else(|| invalid("missing host".to_string()))?;

        Ok(Self { scheme, authority })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Target that always hits `path` on this backend.
    pub fn fixed(&self, path: impl Into<String>) -> BackendTarget {
        BackendTarget {
            backend: self.clone(),
            path: TargetPath::Fixed(path.into()),
        }
    }

    /// Target that forwards the request path as left by the stages.
    pub fn passthrough(&self) -> BackendTarget {
        BackendTarget {
            backend: self.clone(),
            path: TargetPath::Rewritten,
        }
    }
}

/// How the outbound path is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetPath {
    /// A literal backend endpoint, e.g. `/signup`.
    Fixed(String),
    /// The in-flight request path after all stages ran.
    Rewritten,
}

/// Where a route forwards to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    backend: Backend,
    path: TargetPath,
}

impl BackendTarget {
    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn path(&self) -> &TargetPath {
        &self.path
    }

    /// Build the outbound URI. The query string is always carried over.
    pub fn uri_for(&self, request_path: &str, query: Option<&str>) -> Result<Uri, axum::http::Error> {
        let path = match &self.path {
            TargetPath::Fixed(path) => path.as_str(),
            TargetPath::Rewritten if request_path.is_empty() => "/",
            TargetPath::Rewritten => request_path,
        };
        let path_and_query: PathAndQuery = match query {
            Some(q) => format!("{path}?{q}").parse()?,
            None => path.parse()?,
        };

        Ok(Uri::builder()
            .scheme(self.backend.scheme.clone())
            .authority(self.backend.authority.clone())
            .path_and_query(path_and_query)
            .build()?)
    }
}
