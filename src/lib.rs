//! Concierge: a configuration-driven HTTP reverse proxy.
//!
//! Requests to `<prefix>/<route>/<rest>` are forwarded to the backend
//! configured for `<route>` as `<target><rest>`, with the query string
//! passed through verbatim, headers adjusted by [`http::HeaderPolicy`], and
//! the backend's response relayed unchanged.

pub mod caching;
pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
