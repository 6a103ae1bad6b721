//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler
//! - Wire up middleware (tracing, request ID, body limit)
//! - Bound the number of requests handled at once
//! - Serve until the shutdown signal fires
//!
//! # Design Decisions
//! - The request ID layer wraps the trace layer, so every request span
//!   carries the ID stamped for it

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, Method, Request, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Semaphore};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::config::{ConfigError, ProxyConfig};
use crate::forward::{Forwarder, HttpForwarder};
use crate::http::dispatch::{Dispatcher, InboundRequest};
use crate::http::request::{request_id, request_id_layer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub in_flight: Arc<Semaphore>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server forwarding over the pooled HTTP client.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let forwarder: Arc<dyn Forwarder> = Arc::new(HttpForwarder::new(&config.upstream));
        Self::with_forwarder(config, forwarder)
    }

    /// Create a server with a custom base forwarder.
    pub fn with_forwarder(config: ProxyConfig, forwarder: Arc<dyn Forwarder>) -> Result<Self, ConfigError> {
        let dispatcher = Arc::new(Dispatcher::new(&config, forwarder)?);
        let state = AppState {
            dispatcher,
            in_flight: Arc::new(Semaphore::new(config.listener.max_concurrent_requests)),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .fallback(proxy_handler)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.proxy.max_body_size))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(request_id_layer())
    }

    /// A clone of the router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.config.proxy.prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Span wrapping one inbound request.
fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()),
    )
}

/// Proxy handler for every path; the dispatcher decides what is proxied.
async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Ok(_permit) = state.in_flight.acquire().await else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Proxy is shutting down").into_response();
    };

    state
        .dispatcher
        .dispatch(InboundRequest {
            method,
            uri,
            headers,
            body,
        })
        .await
}
