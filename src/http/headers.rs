//! Header policy for forwarded requests.
//!
//! # Responsibilities
//! - Strip hop-by-hop and transport headers the outbound client regenerates
//! - Strip proxy-internal tracing headers (`x-concierge-*`)
//! - Inject default and JSON content negotiation
//! - Stamp `X-Forwarded-By` with the proxy identity
//!
//! # Design Decisions
//! - Pure and deterministic: same input headers, same output headers
//! - Every other caller-supplied header passes through, repeated values included
//! - Later rules override earlier ones

use axum::http::{
    header::{ACCEPT, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HOST, TRANSFER_ENCODING},
    HeaderMap, HeaderName, HeaderValue,
};

/// Headers removed before forwarding.
pub const REMOVED_HEADERS: [HeaderName; 4] = [HOST, CONTENT_LENGTH, CONNECTION, TRANSFER_ENCODING];

/// Namespace for headers the proxy itself adds to inbound requests.
pub const INTERNAL_HEADER_PREFIX: &str = "x-concierge-";

/// Header naming the proxy on every forwarded request.
pub static X_FORWARDED_BY: HeaderName = HeaderName::from_static("x-forwarded-by");

const APPLICATION_JSON: HeaderValue = HeaderValue::from_static("application/json");

/// Computes outgoing headers from inbound ones.
#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    identity: HeaderValue,
}

impl HeaderPolicy {
    /// Create a policy stamping `identity` as `X-Forwarded-By`.
    pub fn new(identity: HeaderValue) -> Self {
        Self { identity }
    }

    /// Apply the policy. `json` forces JSON `Content-Type` and `Accept`.
    pub fn apply(&self, inbound: &HeaderMap, json: bool) -> HeaderMap {
        let mut outbound = HeaderMap::with_capacity(inbound.len() + 2);

        for (name, value) in inbound {
            if is_removed(name) {
                continue;
            }
            outbound.append(name.clone(), value.clone());
        }

        if !outbound.contains_key(ACCEPT) {
            outbound.insert(ACCEPT, APPLICATION_JSON);
        }

        if json {
            outbound.insert(CONTENT_TYPE, APPLICATION_JSON);
            outbound.insert(ACCEPT, APPLICATION_JSON);
        }

        outbound.insert(X_FORWARDED_BY.clone(), self.identity.clone());
        outbound
    }
}

fn is_removed(name: &HeaderName) -> bool {
    REMOVED_HEADERS.contains(name) || name.as_str().starts_with(INTERNAL_HEADER_PREFIX)
}
