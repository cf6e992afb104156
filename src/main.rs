//! API gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────┐
//!                      │                   API GATEWAY                    │
//!   Client Request     │  ┌────────┐   ┌──────┐   ┌───────┐   ┌────────┐  │
//!   ───────────────────┼─▶│  CORS  │──▶│ route│──▶│ auth  │──▶│ strip  │  │
//!                      │  │        │   │ table│   │ stage │   │ prefix │  │
//!                      │  └────────┘   └──────┘   └───┬───┘   └───┬────┘  │
//!                      │                              │           │       │
//!                      │                   /token-verify          ▼       │
//!                      │                              │     ┌──────────┐  │
//!   Client Response    │                              ▼     │forwarder │──┼──▶ auth / notes
//!   ◀──────────────────┼───────────────────────── auth svc  │(streamed)│◀─┼─── backend
//!                      │                                    └──────────┘  │
//!                      └──────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use api_gateway::config::{load_config, validate_config, ConfigError, GatewayConfig};
use api_gateway::lifecycle::{trigger_on_signal, Shutdown};
use api_gateway::observability::{logging, metrics};
use api_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "api-gateway")]
#[command(about = "Authenticating HTTP API gateway", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8080.
    #[arg(long, env = "GATEWAY_BIND")]
    bind: Option<String>,

    /// Base URL of the authorization service.
    #[arg(long, env = "AUTH_SERVICE_URL")]
    auth_backend: Option<String>,

    /// Base URL of the notes service.
    #[arg(long, env = "NOTES_SERVICE_URL")]
    notes_backend: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "GATEWAY_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Flags win over the file.
    fn apply(self, config: &mut GatewayConfig) {
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(auth) = self.auth_backend {
            config.backends.auth = auth;
        }
        if let Some(notes) = self.notes_backend {
            config.backends.notes = notes;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_tracing(&config.observability);
    tracing::info!("api-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        auth_backend = %config.backends.auth,
        notes_backend = %config.backends.notes,
        verify_timeout_ms = config.timeouts.verify_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    trigger_on_signal(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
