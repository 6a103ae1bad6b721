//! Request dispatch.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → routing::split_route   (route name after the prefix)   ✗ OutsidePrefix / MalformedPath
//!     → RouteTable::resolve    (enabled routes only)           ✗ RouteNotFound
//!     → rewrite_path + HeaderPolicy (pure)
//!     → route's Forwarder chain                                ✗ Transport
//!     → relay status/headers/body verbatim, log classification
//! ```
//!
//! # Design Decisions
//! - Only the route table is shared between requests, read-only
//! - Routing errors are answered immediately, never forwarded or retried
//! - Logging is observational; it never changes the outcome

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, Method, Uri};
use axum::response::{IntoResponse, Response};

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::config::ConfigError;
use crate::forward::{self, ForwardRequest, Forwarder};
use crate::http::headers::HeaderPolicy;
use crate::http::request::request_id;
use crate::http::response::{classify, relay, DispatchError};
use crate::observability::metrics;
use crate::routing::{rewrite_path, split_route, Route, RouteTable, SplitError};

/// The parts of an inbound request the dispatcher needs.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Routes inbound requests to their backends.
pub struct Dispatcher {
    prefix: String,
    routes: RouteTable,
    policy: HeaderPolicy,
    forwarders: HashMap<String, Arc<dyn Forwarder>>,
}

impl Dispatcher {
    /// Build the dispatcher, wrapping `base` with each route's policies.
    ///
    /// Fails when the configuration does not validate.
    pub fn new(config: &ProxyConfig, base: Arc<dyn Forwarder>) -> Result<Self, ConfigError> {
        validate_config(config)?;

        let routes = RouteTable::from_config(&config.routes).map_err(|e| vec![e])?;
        let identity = HeaderValue::from_str(&config.proxy.identity)
            .map_err(|_| vec![ValidationError::InvalidIdentity(config.proxy.identity.clone())])?;

        let forwarders = config
            .routes
            .iter()
            .filter(|(name, _)| routes.resolve(name).is_some())
            .map(|(name, route)| (name.clone(), forward::compose(base.clone(), name, route)))
            .collect();

        Ok(Self {
            prefix: config.proxy.prefix.clone(),
            routes,
            policy: HeaderPolicy::new(identity),
            forwarders,
        })
    }

    /// The active route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Resolve the route and build the forwarded request. Pure.
    pub fn prepare(&self, request: &InboundRequest) -> Result<(&Route, ForwardRequest), DispatchError> {
        let path = request.uri.path();

        let matched = split_route(path, &self.prefix).map_err(|e| match e {
            SplitError::OutsidePrefix => DispatchError::OutsidePrefix(path.to_string()),
            SplitError::MissingRouteName => DispatchError::MalformedPath(path.to_string()),
        })?;

        let route = self
            .routes
            .resolve(matched.name)
            .ok_or_else(|| DispatchError::RouteNotFound(matched.name.to_string()))?;

        let forwarded_path = rewrite_path(path, matched.base_path, request.uri.query());
        let body = (!request.body.is_empty()).then(|| request.body.clone());

        Ok((
            route,
            ForwardRequest {
                method: request.method.clone(),
                path: forwarded_path,
                headers: self.policy.apply(&request.headers, route.json),
                body,
                target: route.target.clone(),
            },
        ))
    }

    /// Handle one inbound request end to end.
    pub async fn dispatch(&self, request: InboundRequest) -> Response {
        let start = Instant::now();
        let request_id = request_id(&request.headers).to_string();
        let method = request.method.to_string();
        let original = request
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| request.uri.path().to_string());

        tracing::debug!(request_id = %request_id, method = %method, path = %original, "Received request");

        let (route, forward_request) = match self.prepare(&request) {
            Ok(prepared) => prepared,
            Err(e) => {
                tracing::warn!(request_id = %request_id, method = %method, path = %original, error = %e, "Rejected request");
                metrics::record_request(&method, e.status().as_u16(), "none", "ERROR", start);
                return e.into_response();
            }
        };

        if let Some(query) = request.uri.query().filter(|q| !q.is_empty()) {
            tracing::info!(request_id = %request_id, query = %query, path = %request.uri.path(), "[REQUEST] Query parameters");
        }

        let url = forward_request.url();
        tracing::info!(
            request_id = %request_id,
            route = %route.name,
            "[PROXY] {} {} -> {}",
            method,
            original,
            url
        );

        let Some(forwarder) = self.forwarders.get(&route.name) else {
            // Every resolvable route gets a forwarder at construction.
            let e = DispatchError::RouteNotFound(route.name.clone());
            return e.into_response();
        };

        match forwarder.forward(forward_request).await {
            Ok(result) => {
                let classification = classify(result.status);
                tracing::info!(
                    request_id = %request_id,
                    route = %route.name,
                    status = result.status.as_u16(),
                    "[RESPONSE] {} {} (from: {})",
                    result.status.as_u16(),
                    classification,
                    url
                );
                metrics::record_request(&method, result.status.as_u16(), &route.name, classification, start);
                relay(result)
            }
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    route = %route.name,
                    method = %method,
                    path = %original,
                    target = %url,
                    error = %e,
                    "Upstream request failed"
                );
                metrics::record_upstream_error(&route.name, e.kind());
                let e = DispatchError::from(e);
                metrics::record_request(&method, e.status().as_u16(), &route.name, "ERROR", start);
                e.into_response()
            }
        }
    }
}
