//! Response relay and error mapping.
//!
//! # Responsibilities
//! - Relay a backend response to the caller verbatim
//! - Classify backend statuses for logs and metrics
//! - Map dispatch errors to caller-visible HTTP statuses
//!
//! # Design Decisions
//! - Backend statuses are never reinterpreted, 4xx/5xx included
//! - Bodies are relayed buffered, so framing headers (`transfer-encoding`,
//!   `connection`, `keep-alive`) are dropped and regenerated by the server
//! - Classification is binary: OK for exactly 200, ERROR otherwise
//! - Transport failures become 502, upstream timeouts 504

use axum::{
    body::Body,
    http::{
        header::{CONNECTION, TRANSFER_ENCODING},
        HeaderName, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::forward::{ForwardError, ForwardResult};

/// Log classification of a relayed status.
pub fn classify(status: StatusCode) -> &'static str {
    if status == StatusCode::OK {
        "OK"
    } else {
        "ERROR"
    }
}

/// Backend response headers describing the backend connection's framing.
const FRAMING_HEADERS: [HeaderName; 3] = [
    TRANSFER_ENCODING,
    CONNECTION,
    HeaderName::from_static("keep-alive"),
];

/// Build the caller-facing response from a backend result.
pub fn relay(result: ForwardResult) -> Response {
    let mut headers = result.headers;
    for name in &FRAMING_HEADERS {
        headers.remove(name);
    }

    let mut response = Response::new(Body::from(result.body));
    *response.status_mut() = result.status;
    *response.headers_mut() = headers;
    response
}

/// Why a request could not be relayed.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The path is not under the proxy prefix.
    #[error("no proxy route for path {0}")]
    OutsidePrefix(String),

    /// The path is under the prefix but names no route.
    #[error("malformed proxy path {0}: missing route name")]
    MalformedPath(String),

    /// Unknown or disabled route.
    #[error("route not found: {0}")]
    RouteNotFound(String),

    /// The backend could not be reached or did not answer.
    #[error(transparent)]
    Transport(#[from] ForwardError),
}

impl DispatchError {
    /// Status returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::OutsidePrefix(_) | DispatchError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            DispatchError::MalformedPath(_) => StatusCode::BAD_REQUEST,
            DispatchError::Transport(ForwardError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            DispatchError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
