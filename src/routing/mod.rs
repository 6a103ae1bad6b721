//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → matcher.rs (split "<prefix>/<route>/<rest>")
//!     → table.rs (route lookup by name)
//!     → rewrite.rs (forwarded path + raw query)
//!     → Return: resolved Route + forwarded path, or explicit error
//!
//! Route compilation (at startup):
//!     routes table from config
//!     → drop disabled routes
//!     → validate and normalise targets
//!     → freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix split + hash lookup)
//! - Deterministic: same input always resolves the same way
//! - Disabled routes are indistinguishable from unknown ones

pub mod matcher;
pub mod rewrite;
pub mod table;

pub use matcher::{split_route, RouteMatch, SplitError};
pub use rewrite::rewrite_path;
pub use table::{Route, RouteTable};
