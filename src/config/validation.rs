//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every enabled route has a usable backend URL
//! - Validate value ranges (attempts >= 1, ttl > 0, in-flight limit, timeouts)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Disabled routes are skipped; they are never loaded

use axum::http::{HeaderValue, Uri};
use thiserror::Error;
use tokio::sync::Semaphore;
use url::Url;

use crate::config::schema::{ProxyConfig, RouteConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("proxy prefix {0:?} must start with '/' and must not end with '/'")]
    InvalidPrefix(String),

    #[error("proxy identity {0:?} is not a valid header value")]
    InvalidIdentity(String),

    #[error("listener.max_concurrent_requests must be between 1 and {max}, got {value}")]
    InvalidConcurrencyLimit { value: usize, max: usize },

    #[error("upstream.request_timeout_secs must be greater than 0")]
    InvalidRequestTimeout,

    #[error("route name {0:?} must be non-empty and must not contain '/'")]
    InvalidRouteName(String),

    #[error("route {route}: missing target")]
    MissingTarget { route: String },

    #[error("route {route}: invalid target {target:?}: {reason}")]
    InvalidTarget {
        route: String,
        target: String,
        reason: String,
    },

    #[error("route {route}: resilience.max_attempts must be at least 1")]
    InvalidMaxAttempts { route: String },

    #[error("route {route}: resilience.delay_factor must be at least 1")]
    InvalidDelayFactor { route: String },

    #[error("route {route}: caching.ttl_secs must be greater than 0")]
    InvalidTtl { route: String },
}

/// Validate a whole configuration, collecting every problem.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let prefix = &config.proxy.prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') {
        errors.push(ValidationError::InvalidPrefix(prefix.clone()));
    }

    if HeaderValue::from_str(&config.proxy.identity).is_err() {
        errors.push(ValidationError::InvalidIdentity(config.proxy.identity.clone()));
    }

    let limit = config.listener.max_concurrent_requests;
    if limit == 0 || limit > Semaphore::MAX_PERMITS {
        errors.push(ValidationError::InvalidConcurrencyLimit {
            value: limit,
            max: Semaphore::MAX_PERMITS,
        });
    }

    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::InvalidRequestTimeout);
    }

    for (name, route) in config.routes.iter().filter(|(_, r)| r.enabled) {
        validate_route(name, route, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(name: &str, route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    if name.is_empty() || name.contains('/') {
        errors.push(ValidationError::InvalidRouteName(name.to_string()));
    }

    match route.target.as_deref() {
        None | Some("") => errors.push(ValidationError::MissingTarget {
            route: name.to_string(),
        }),
        Some(target) => {
            if let Err(reason) = validate_target(target) {
                errors.push(ValidationError::InvalidTarget {
                    route: name.to_string(),
                    target: target.to_string(),
                    reason,
                });
            }
        }
    }

    if route.resilience.enabled {
        if route.resilience.max_attempts == 0 {
            errors.push(ValidationError::InvalidMaxAttempts {
                route: name.to_string(),
            });
        }
        if route.resilience.delay_factor == 0 {
            errors.push(ValidationError::InvalidDelayFactor {
                route: name.to_string(),
            });
        }
    }

    if route.caching.enabled && route.caching.ttl_secs == 0 {
        errors.push(ValidationError::InvalidTtl {
            route: name.to_string(),
        });
    }
}

/// Check a backend base URL is something the forwarder can call.
///
/// The raw string must be a valid `Uri` as written: `Url` alone would
/// silently percent-encode characters the outbound client rejects.
pub fn validate_target(target: &str) -> Result<(), String> {
    let url = Url::parse(target).map_err(|e| e.to_string())?;
    target.parse::<Uri>().map_err(|e| e.to_string())?;

    if url.scheme() != "http" {
        return Err(format!("unsupported scheme '{}', only http is supported", url.scheme()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    Ok(())
}
