//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing, request ID, concurrency limit)
//!     → request.rs (stamp request ID)
//!     → dispatch.rs (route, rewrite, forward)
//!     → headers.rs (outgoing header policy)
//!     → response.rs (relay verbatim or map error)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::{Dispatcher, InboundRequest};
pub use headers::HeaderPolicy;
pub use request::{request_id_layer, X_REQUEST_ID};
pub use response::{classify, DispatchError};
pub use server::HttpServer;
