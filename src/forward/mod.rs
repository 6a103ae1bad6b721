//! Outbound forwarding.
//!
//! # Data Flow
//! ```text
//! ForwardRequest (method, path, headers, body, target)
//!     → [CachingForwarder]   (only when the route enables caching)
//!     → [RetryingForwarder]  (only when the route enables resilience)
//!     → HttpForwarder        (hyper-util pooled client)
//!     → ForwardResult (status, headers, body) | ForwardError
//! ```
//!
//! # Design Decisions
//! - Any HTTP response, 4xx/5xx included, is a successful ForwardResult
//! - Only transport failures are errors
//! - Caching and retries are decorators; the core forwarder knows neither

pub mod client;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use thiserror::Error;

use crate::caching::CachingForwarder;
use crate::config::schema::RouteConfig;
use crate::resilience::retries::RetryingForwarder;

pub use client::HttpForwarder;

/// A fully rewritten request, ready to send to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRequest {
    pub method: Method,
    /// Forwarded path, always starting with '/', raw query included.
    pub path: String,
    pub headers: HeaderMap,
    /// `None` when the inbound request carried no body.
    pub body: Option<Bytes>,
    /// Backend base URL without a trailing slash.
    pub target: String,
}

impl ForwardRequest {
    /// The absolute URL the request is sent to.
    pub fn url(&self) -> String {
        format!("{}{}", self.target, self.path)
    }
}

/// A backend response, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardResult {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Transport-level failure of an outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForwardError {
    /// The connection could not be established (refused, DNS, unreachable).
    #[error("could not connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// No complete response within the request timeout.
    #[error("request to {url} timed out after {after:?}")]
    Timeout { url: String, after: Duration },

    /// The request failed after the connection was made.
    #[error("request to {url} failed: {reason}")]
    Request { url: String, reason: String },
}

impl ForwardError {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ForwardError::Connect { .. } => "connect",
            ForwardError::Timeout { .. } => "timeout",
            ForwardError::Request { .. } => "request",
        }
    }
}

/// Issues one outbound call.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, request: ForwardRequest) -> Result<ForwardResult, ForwardError>;
}

/// Wrap `base` in the decorators a route enables.
///
/// The cache sits outermost so a hit never reaches the retry layer.
pub fn compose(base: Arc<dyn Forwarder>, route: &str, config: &RouteConfig) -> Arc<dyn Forwarder> {
    let mut forwarder = base;

    if config.resilience.enabled {
        tracing::info!(
            route = %route,
            max_attempts = config.resilience.max_attempts,
            delay_ms = config.resilience.delay_ms,
            delay_factor = config.resilience.delay_factor,
            "Retries enabled"
        );
        forwarder = Arc::new(RetryingForwarder::new(forwarder, route, &config.resilience));
    }

    if config.caching.enabled {
        tracing::info!(
            route = %route,
            ttl_secs = config.caching.ttl_secs,
            key_fields = ?config.caching.key_fields,
            "Response caching enabled"
        );
        forwarder = Arc::new(CachingForwarder::new(forwarder, route, &config.caching));
    }

    forwarder
}
