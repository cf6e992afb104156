//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all pipeline handler
//! - Wire up middleware (request ID, access log)
//! - Bind server to listener
//! - Dispatch every request to the pipeline

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware,
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::config::GatewayConfig;
use crate::error::StartupError;
use crate::observability::logging::access_log;
use crate::pipeline::Pipeline;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let pipeline = Arc::new(Pipeline::from_config(&config)?);

        tracing::info!(
            routes = pipeline.table().len(),
            auth_backend = %config.backends.auth,
            notes_backend = %config.backends.notes,
            "Route table built"
        );
        for route in pipeline.table().routes() {
            tracing::debug!(
                method = %route.method(),
                pattern = %route.pattern(),
                stages = route.stages().len(),
                "Route registered"
            );
        }

        let router = Self::build_router(AppState { pipeline });
        Ok(Self { router })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// No timeout layer here: the forwarder bounds backend calls, so slow
    /// backends still get a JSON 504 with CORS headers from the pipeline.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(gateway_handler))
            .route("/", any(gateway_handler))
            .with_state(state)
            .layer(middleware::from_fn(access_log))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving the gateway without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn gateway_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    state.pipeline.handle(request).await
}
