//! Route lookup.
//!
//! # Responsibilities
//! - Store the enabled routes built from configuration
//! - Look up a route by exact, case-sensitive name
//! - Return explicit no-match for unknown and disabled names alike
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(1) lookup via HashMap
//! - Construction fails on the first unusable target

use std::collections::{BTreeMap, HashMap};

use crate::config::schema::RouteConfig;
use crate::config::validation::{validate_target, ValidationError};

/// An enabled, validated route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Route name, the first path segment after the proxy prefix.
    pub name: String,
    /// Backend base URL without a trailing slash.
    pub target: String,
    /// Whether forwarded requests get JSON content negotiation headers.
    pub json: bool,
}

/// Immutable mapping from route name to route.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
}

impl RouteTable {
    /// Build the table from the configured routes.
    ///
    /// Disabled routes are skipped entirely. An enabled route without a
    /// usable target fails the whole build.
    pub fn from_config(configs: &BTreeMap<String, RouteConfig>) -> Result<Self, ValidationError> {
        if configs.is_empty() {
            tracing::warn!("No routes configured; every proxied request will be rejected");
        }

        let mut routes = HashMap::new();
        for (name, config) in configs {
            if !config.enabled {
                tracing::info!(route = %name, "Skipping disabled proxy route");
                continue;
            }

            let target = config
                .target
                .as_deref()
                .filter(|t| !t.is_empty())
                .ok_or_else(|| ValidationError::MissingTarget { route: name.clone() })?;

            validate_target(target).map_err(|reason| ValidationError::InvalidTarget {
                route: name.clone(),
                target: target.to_string(),
                reason,
            })?;

            let target = target.trim_end_matches('/').to_string();
            tracing::info!(route = %name, target = %target, json = config.json, "Configuring proxy route");

            routes.insert(
                name.clone(),
                Route {
                    name: name.clone(),
                    target,
                    json: config.json,
                },
            );
        }

        Ok(Self { routes })
    }

    /// Exact-match lookup. Disabled routes are never present.
    pub fn resolve(&self, name: &str) -> Option<&Route> {
        self.routes.get(name)
    }

    /// Number of active routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no route is active.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate over active routes.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }
}
