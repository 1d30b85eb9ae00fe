//! Palisade Server - the HTTP gateway.
//!
//! Wires the inspection core into an axum router in front of the backend
//! catalogue service.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness check
//! - `GET /metrics` - Security counters plus uptime
//! - `GET /api/pens` - Guarded proxy: catalogue listing
//! - `GET /api/pens/{id}` - Guarded proxy: single catalogue entry
//! - `POST /api/search` - Guarded proxy: catalogue search
//! - `POST /test/prompt-injection` - Demo endpoint
//! - `POST /test/secret-detection` - Demo endpoint
//!
//! The `/api` routes pass through the security guard: inbound body+query
//! text is classified and blocked with a structured 400 on a pattern hit;
//! outbound response bodies are redacted before being returned.
//!
//! ## Example
//!
//! ```no_run
//! use palisade_server::{Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Server::new(ServerConfig::default()).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod error;
mod guard;
mod handlers;
pub mod models;
pub mod state;
pub mod upstream;

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

pub use error::{ApiError, Result};
pub use state::AppState;
pub use upstream::{UpstreamClient, UpstreamError, UpstreamResponse};

/// Default gateway port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind host (localhost only).
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default backend base URL.
pub const DEFAULT_UPSTREAM: &str = "http://127.0.0.1:3001";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1).
    pub host: String,
    /// Port to bind to (default: 8080).
    pub port: u16,
    /// Base URL of the proxied backend.
    pub upstream_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            upstream_url: DEFAULT_UPSTREAM.to_string(),
        }
    }
}

impl ServerConfig {
    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the backend base URL.
    pub fn with_upstream(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = url.into();
        self
    }
}

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("failed to bind to {0}: {1}")]
    BindError(SocketAddr, std::io::Error),

    /// Server runtime error.
    #[error("server error: {0}")]
    Runtime(String),
}

/// Builds the gateway router over the given state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let guarded = Router::new()
        .route("/api/pens", get(handlers::list_pens))
        .route("/api/pens/{id}", get(handlers::get_pen))
        .route("/api/search", post(handlers::search_pens))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::security_guard,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/test/prompt-injection", post(handlers::test_prompt_injection))
        .route("/test/secret-detection", post(handlers::test_secret_detection))
        .merge(guarded)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(cors)
        .layer(DefaultBodyLimit::max(guard::MAX_BODY_BYTES))
        .with_state(state)
}

/// The HTTP gateway server.
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Creates a new server with the given configuration.
    pub fn new(config: ServerConfig) -> std::result::Result<Self, ServerError> {
        let state = AppState::new(config.upstream_url.clone());
        Self::with_state(config, state)
    }

    /// Creates a server with custom application state.
    pub fn with_state(
        config: ServerConfig,
        state: AppState,
    ) -> std::result::Result<Self, ServerError> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| ServerError::Runtime(format!("invalid address: {}", e)))?;

        Ok(Self {
            router: router(state),
            addr,
        })
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the router for testing or embedding.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Runs the server until shutdown.
    pub async fn run(self) -> std::result::Result<(), ServerError> {
        info!("Starting Palisade gateway on {}", self.addr);

        // Create socket with SO_REUSEADDR to allow binding even when sockets are lingering
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        socket
            .set_reuse_address(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        socket
            .bind(&self.addr.into())
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .listen(128)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        // Set non-blocking for tokio
        socket
            .set_nonblocking(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        let std_listener: std::net::TcpListener = socket.into();
        let listener = tokio::net::TcpListener::from_std(std_listener)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        axum::serve(listener, self.router)
            .await
            .map_err(|e| ServerError::Runtime(e.to_string()))?;

        Ok(())
    }
}
