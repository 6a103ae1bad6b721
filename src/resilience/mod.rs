//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! ForwardRequest
//!     → retries.rs (RetryingForwarder: attempt, classify failure)
//!     → On retryable failure: backoff.rs (exponential delay) and try again
//!     → Final result or last error returned to the dispatcher
//! ```
//!
//! # Design Decisions
//! - Opt-in per route; the core forwarder never retries
//! - Connection failures are always retryable
//! - Timeouts, other failures and configured statuses only for idempotent methods
//! - Routing errors never reach this layer, so they are never retried

pub mod backoff;
pub mod retries;

pub use retries::RetryingForwarder;
