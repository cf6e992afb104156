//! Pipeline driver: one inbound request in, exactly one response out.
//!
//! ```text
//! request
//!     → strip hop-by-hop headers
//!     → global stages (CORS)
//!     → RouteTable::resolve (miss → 404)
//!     → route stages, in registration order (abort → that response)
//!     → target: local health handler or Forwarder (failure → 502, slow → 504)
//!     → CORS headers added to whatever response came out
//! ```

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};

use crate::auth::IdentityVerifier;
use crate::config::GatewayConfig;
use crate::error::{ApiError, StartupError};
use crate::http::middleware::{apply_cors, apply_strip_prefix, authenticate};
use crate::http::response::health_response;
use crate::pipeline::{Flow, RequestContext, Stage};
use crate::proxy::{strip_hop_by_hop, Backend, ForwardError, Forwarder, InvalidBackend};
use crate::routing::{gateway_routes, RouteTable, Target};

/// Pattern of the route that served a response, for the access log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRoute(pub String);

/// Read-only request pipeline shared by all connections.
#[derive(Debug)]
pub struct Pipeline {
    table: RouteTable,
    verifier: IdentityVerifier,
    forwarder: Forwarder,
}

impl Pipeline {
    pub fn new(table: RouteTable, verifier: IdentityVerifier, forwarder: Forwarder) -> Self {
        Self {
            table,
            verifier,
            forwarder,
        }
    }

    /// Assemble the gateway's pipeline from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, StartupError> {
        let backend = |url: &str| {
            Backend::parse(url).map_err(|InvalidBackend { url, reason }| StartupError::Backend { url, reason })
        };
        let auth = backend(&config.backends.auth)?;
        let notes = backend(&config.backends.notes)?;

        let table = gateway_routes(&auth, &notes)?;
        let verifier = IdentityVerifier::new(&config.backends.auth, &config.timeouts)?;
        let forwarder = Forwarder::new(&config.timeouts);

        Ok(Self::new(table, verifier, forwarder))
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Run one request through the pipeline.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let mut ctx = RequestContext::from_request(request);
        strip_hop_by_hop(ctx.headers_mut());

        let mut response = self.drive(&mut ctx).await;
        ctx.decorate_response(response.headers_mut());
        response
    }

    async fn drive(&self, ctx: &mut RequestContext) -> Response {
        if let Flow::Respond(response) = self.run_stages(self.table.global_stages(), ctx).await {
            return response;
        }

        let Some(route) = self.table.resolve(ctx.method(), ctx.path()) else {
            tracing::debug!(method = %ctx.method(), path = %ctx.path(), "No route matched");
            return ApiError::not_found(format!("No route for {} {}", ctx.method(), ctx.path()))
                .into_response();
        };

        let mut response = match self.run_stages(route.stages(), ctx).await {
            Flow::Respond(response) => response,
            Flow::Continue => match route.target() {
                Target::Health => health_response(),
                Target::Backend(target) => match self.forwarder.forward(target, ctx).await {
                    Ok(response) => response,
                    Err(e) => {
                        tracing::error!(
                            route = %route.pattern(),
                            upstream = %target.backend().authority(),
                            error = %e,
                            "Upstream error"
                        );
                        match e {
                            ForwardError::Timeout(_) => {
                                ApiError::gateway_timeout("Upstream request timed out")
                            }
                            _ => ApiError::bad_gateway("Upstream request failed"),
                        }
                        .into_response()
                    }
                },
            },
        };

        response
            .extensions_mut()
            .insert(MatchedRoute(route.pattern().to_string()));
        response
    }

    async fn run_stages(&self, stages: &[Stage], ctx: &mut RequestContext) -> Flow {
        for stage in stages {
            let flow = self.run_stage(stage, ctx).await;
            if !flow.is_continue() {
                tracing::debug!(%stage, path = %ctx.path(), "Stage answered request");
                return flow;
            }
        }
        Flow::Continue
    }

    async fn run_stage(&self, stage: &Stage, ctx: &mut RequestContext) -> Flow {
        match stage {
            Stage::Cors => apply_cors(ctx),
            Stage::Authenticate => authenticate(&self.verifier, ctx).await,
            Stage::StripPrefix(prefix) => apply_strip_prefix(prefix, ctx),
        }
    }
}
