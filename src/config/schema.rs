//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, concurrency).
    pub listener: ListenerConfig,

    /// Inbound surface: path prefix and proxy identity.
    pub proxy: ProxySettings,

    /// Outbound client settings.
    pub upstream: UpstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Named routes, keyed by route name.
    pub routes: BTreeMap<String, RouteConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum requests handled at once (backpressure).
    pub max_concurrent_requests: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_concurrent_requests: 10_000,
        }
    }
}

/// Settings for the inbound proxy surface.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxySettings {
    /// Path prefix all proxied requests live under. No trailing slash.
    pub prefix: String,

    /// Value sent in `X-Forwarded-By` on every forwarded request.
    pub identity: String,

    /// Largest inbound body accepted, in bytes.
    pub max_body_size: usize,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            prefix: "/proxy".to_string(),
            identity: "Concierge-Proxy".to_string(),
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Outbound HTTP client configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total time allowed for one outbound request/response in seconds.
    pub request_timeout_secs: u64,

    /// How long an idle pooled connection is kept, in seconds.
    pub pool_idle_timeout_secs: u64,

    /// Idle connections kept per backend host.
    pub pool_max_idle_per_host: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
            pool_idle_timeout_secs: 60,
            pool_max_idle_per_host: 32,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// A single named route.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Disabled routes are never loaded into the route table.
    pub enabled: bool,

    /// Backend base URL (e.g., "http://127.0.0.1:3000/api").
    pub target: Option<String>,

    /// Force JSON content negotiation headers on forwarded requests.
    pub json: bool,

    /// Response caching in front of the forwarder.
    pub caching: CachingConfig,

    /// Retry policy around the forwarder.
    pub resilience: ResilienceConfig,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            target: None,
            json: true,
            caching: CachingConfig::default(),
            resilience: ResilienceConfig::default(),
        }
    }
}

impl RouteConfig {
    /// Convenience constructor for an enabled route with default policies.
    pub fn to(target: impl Into<String>) -> Self {
        Self {
            target: Some(target.into()),
            ..Self::default()
        }
    }
}

/// Response caching configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CachingConfig {
    /// Enable caching for this route.
    pub enabled: bool,

    /// Time-to-live of a cached response in seconds.
    pub ttl_secs: u64,

    /// Query parameters or headers that make up the cache key.
    pub key_fields: Vec<String>,
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_secs: 10,
            key_fields: Vec::new(),
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Enable retries.
    pub enabled: bool,

    /// Maximum number of attempts, the first one included.
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds.
    pub delay_ms: u64,

    /// Multiplier applied to the delay after each failed attempt.
    pub delay_factor: u32,

    /// Upper bound for a single delay in milliseconds.
    pub max_delay_ms: u64,

    /// Backend statuses that are retried like transport failures.
    pub retry_on_status: Vec<u16>,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: 5,
            delay_ms: 1000,
            delay_factor: 2,
            max_delay_ms: 60_000,
            retry_on_status: Vec::new(),
        }
    }
}
