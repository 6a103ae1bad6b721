//! Response caching decorator.
//!
//! # Data Flow
//! ```text
//! ForwardRequest
//!     → key.rs (method + target + path + configured key fields)
//!     → hit, not expired  → cached ForwardResult
//!     → miss / expired    → inner forwarder → store if cacheable
//! ```
//!
//! # Design Decisions
//! - Only GET and HEAD with a 2xx result are stored
//! - Requests carrying `Authorization` or `Cookie` bypass the cache unless
//!   that header is one of the route's key fields
//! - Transport errors are never cached
//! - Expiry is checked on lookup; expired entries are purged on insert
//! - Shared DashMap, no global lock on the request path

pub mod key;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    Method,
};
use dashmap::DashMap;

use crate::config::schema::CachingConfig;
use crate::forward::{ForwardError, ForwardRequest, ForwardResult, Forwarder};
use crate::observability::metrics;

pub use key::cache_key;

#[derive(Debug, Clone)]
struct CachedResponse {
    result: ForwardResult,
    stored_at: Instant,
}

/// Serves repeated requests from memory for a fixed TTL.
pub struct CachingForwarder {
    inner: Arc<dyn Forwarder>,
    route: String,
    ttl: Duration,
    key_fields: Vec<String>,
    entries: DashMap<String, CachedResponse>,
}

impl CachingForwarder {
    /// Wrap `inner` with the route's caching settings.
    pub fn new(inner: Arc<dyn Forwarder>, route: &str, config: &CachingConfig) -> Self {
        Self::with_ttl(
            inner,
            route,
            Duration::from_secs(config.ttl_secs),
            config.key_fields.clone(),
        )
    }

    /// Wrap `inner` with an explicit TTL.
    pub fn with_ttl(
        inner: Arc<dyn Forwarder>,
        route: &str,
        ttl: Duration,
        key_fields: Vec<String>,
    ) -> Self {
        Self {
            inner,
            route: route.to_string(),
            ttl,
            key_fields,
            entries: DashMap::new(),
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, key: &str) -> Option<ForwardResult> {
        let fresh = self.entries.get(key).and_then(|entry| {
            (entry.stored_at.elapsed() < self.ttl).then(|| entry.result.clone())
        });
        if fresh.is_none() {
            self.entries
                .remove_if(key, |_, entry| entry.stored_at.elapsed() >= self.ttl);
        }
        fresh
    }

    fn store(&self, key: String, result: &ForwardResult) {
        self.entries
            .retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
        self.entries.insert(
            key,
            CachedResponse {
                result: result.clone(),
                stored_at: Instant::now(),
            },
        );
    }
}

fn is_cacheable_method(method: &Method) -> bool {
    method == Method::GET || method == Method::HEAD
}

/// True when the request carries credentials the cache key does not cover.
fn has_unkeyed_credentials(request: &ForwardRequest, key_fields: &[String]) -> bool {
    [AUTHORIZATION, COOKIE].iter().any(|name| {
        request.headers.contains_key(name)
            && !key_fields.iter().any(|f| f.eq_ignore_ascii_case(name.as_str()))
    })
}

#[async_trait]
impl Forwarder for CachingForwarder {
    async fn forward(&self, request: ForwardRequest) -> Result<ForwardResult, ForwardError> {
        if !is_cacheable_method(&request.method)
            || has_unkeyed_credentials(&request, &self.key_fields)
        {
            return self.inner.forward(request).await;
        }

        let key = cache_key(&request, &self.key_fields);
        if let Some(hit) = self.lookup(&key) {
            tracing::debug!(route = %self.route, key = %key, "Cache hit");
            metrics::record_cache_lookup(&self.route, true);
            return Ok(hit);
        }
        metrics::record_cache_lookup(&self.route, false);

        let result = self.inner.forward(request).await?;
        if result.status.is_success() {
            self.store(key, &result);
        }
        Ok(result)
    }
}
