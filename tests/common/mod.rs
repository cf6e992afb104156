//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_gateway::{GatewayConfig, HttpServer, Shutdown};
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

/// One request as a mock backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path and query.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// How the mock authorization endpoint answers `/token-verify`.
#[derive(Debug, Clone)]
pub enum VerifyReply {
    Json(u16, String),
    Hang(Duration),
}

/// A verified identity payload.
pub fn verified(user_id: &str, email: &str, role: &str) -> VerifyReply {
    VerifyReply::Json(
        200,
        serde_json::json!({
            "success": true,
            "data": {"valid": true, "user_id": user_id, "email": email, "role": role}
        })
        .to_string(),
    )
}

#[derive(Clone)]
struct ServiceState {
    reply: Arc<VerifyReply>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
    verify_calls: Arc<AtomicUsize>,
    tokens: Arc<Mutex<Vec<String>>>,
}

/// Mock backend: scripted `POST /token-verify`, every other request recorded.
///
/// Recorded requests are answered 200 (or the status in `x-reply-status`)
/// with an `x-backend: mock` header and a small JSON body.
#[derive(Clone)]
pub struct MockService {
    pub addr: SocketAddr,
    state: ServiceState,
}

impl MockService {
    pub fn recorded(&self) -> Vec<Recorded> {
        self.state.recorded.lock().unwrap().clone()
    }

    pub fn verify_calls(&self) -> usize {
        self.state.verify_calls.load(Ordering::SeqCst)
    }

    pub fn tokens(&self) -> Vec<String> {
        self.state.tokens.lock().unwrap().clone()
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

pub async fn start_service(reply: VerifyReply) -> MockService {
    let state = ServiceState {
        reply: Arc::new(reply),
        recorded: Arc::default(),
        verify_calls: Arc::default(),
        tokens: Arc::default(),
    };

    let app = Router::new()
        .route("/token-verify", post(verify))
        .fallback(record)
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockService { addr, state }
}

async fn verify(State(state): State<ServiceState>, body: Bytes) -> Response {
    state.verify_calls.fetch_add(1, Ordering::SeqCst);
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(&body) {
        if let Some(token) = json["token"].as_str() {
            state.tokens.lock().unwrap().push(token.to_string());
        }
    }

    match &*state.reply {
        VerifyReply::Json(status, body) => (
            StatusCode::from_u16(*status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        VerifyReply::Hang(delay) => {
            tokio::time::sleep(*delay).await;
            StatusCode::OK.into_response()
        }
    }
}

async fn record(State(state): State<ServiceState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let uri = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();

    let status = parts
        .headers
        .get("x-reply-status")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);

    state.recorded.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        uri: uri.clone(),
        headers: parts.headers,
        body,
    });

    (
        status,
        [("x-backend", "mock"), ("content-type", "application/json")],
        Body::from(serde_json::json!({ "seen": uri }).to_string()),
    )
        .into_response()
}

/// A backend that answers every connection with bytes that are not HTTP.
pub async fn start_garbage_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = socket.write_all(b"definitely not http\r\n\r\n").await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// A backend that accepts requests but answers only after `delay`.
pub async fn start_slow_backend(delay: Duration) -> SocketAddr {
    let app = Router::new().fallback(move || async move {
        tokio::time::sleep(delay).await;
        StatusCode::OK
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn config(auth: &str, notes: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.backends.auth = auth.to_string();
    config.backends.notes = notes.to_string();
    config.timeouts.verify_ms = 1_000;
    config
}

/// A gateway serving on an ephemeral port until dropped.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
