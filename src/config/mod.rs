//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → route table + forwarder chains built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; there is no reload path
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    CachingConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, ProxySettings,
    ResilienceConfig, RouteConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
