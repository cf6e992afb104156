//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up the matching route for a method + path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan (acceptable for typical route counts)
//! - Most specific pattern wins; registration order never matters
//! - Same-shape patterns for one method are rejected at build time

use axum::http::Method;

use crate::pipeline::Stage;
use crate::proxy::BackendTarget;
use crate::routing::{PathPattern, RouteError};

/// Terminal step of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Answered by the gateway itself.
    Health,
    /// Forwarded to a backend service.
    Backend(BackendTarget),
}

/// One registered route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    method: Method,
    pattern: PathPattern,
    stages: Vec<Stage>,
    target: Target,
}

impl RouteEntry {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn target(&self) -> &Target {
        &self.target
    }
}

/// Immutable registry of routes plus the stages every request runs first.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    global_stages: Vec<Stage>,
    routes: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// Stages run for every request, before route resolution.
    pub fn global_stages(&self) -> &[Stage] {
        &self.global_stages
    }

    /// Find the most specific route for `method` and `path`.
    pub fn resolve(&self, method: &Method, path: &str) -> Option<&RouteEntry> {
        self.routes
            .iter()
            .filter(|route| route.method == *method && route.pattern.matches(path))
            .max_by_key(|route| route.pattern.specificity())
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Collects registrations; [`RouteTableBuilder::build`] validates them.
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    global_stages: Vec<Stage>,
    pending: Vec<(Method, String, Vec<Stage>, Target)>,
}

impl RouteTableBuilder {
    pub fn global_stage(mut self, stage: Stage) -> Self {
        self.global_stages.push(stage);
        self
    }

    pub fn route(mut self, method: Method, pattern: &str, stages: Vec<Stage>, target: Target) -> Self {
        self.pending.push((method, pattern.to_string(), stages, target));
        self
    }

    /// Register the same pattern, stages and target for several methods.
    pub fn routes(mut self, methods: &[Method], pattern: &str, stages: Vec<Stage>, target: Target) -> Self {
        for method in methods {
            self = self.route(method.clone(), pattern, stages.clone(), target.clone());
        }
        self
    }

    pub fn build(self) -> Result<RouteTable, RouteError> {
        let mut routes: Vec<RouteEntry> = Vec::with_capacity(self.pending.len());

        for (method, raw, stages, target) in self.pending {
            let pattern = PathPattern::parse(&raw)?;

            if let Some(existing) = routes
                .iter()
                .find(|r| r.method == method && r.pattern.same_shape(&pattern))
            {
                return Err(RouteError::Ambiguous {
                    method,
                    existing: existing.pattern.to_string(),
                    conflicting: raw,
                });
            }

            routes.push(RouteEntry {
                method,
                pattern,
                stages,
                target,
            });
        }

        Ok(RouteTable {
            global_stages: self.global_stages,
            routes,
        })
    }
}
