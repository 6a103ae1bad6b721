//! Outbound HTTP client.
//!
//! # Responsibilities
//! - Send a ForwardRequest to its backend over a pooled connection
//! - Buffer the backend response
//! - Classify transport failures (connect, timeout, other)
//!
//! # Design Decisions
//! - hyper-util legacy client with a bounded idle pool per host
//! - One deadline covers connect, send and body read
//! - Dropping the future cancels the in-flight call

use std::error::Error as StdError;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, Uri};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::schema::UpstreamConfig;
use crate::forward::{ForwardError, ForwardRequest, ForwardResult, Forwarder};

/// Forwarder backed by a pooled hyper client.
#[derive(Clone)]
pub struct HttpForwarder {
    client: Client<HttpConnector, Body>,
    request_timeout: Duration,
}

impl HttpForwarder {
    /// Create a forwarder from the upstream settings.
    pub fn new(config: &UpstreamConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build(connector);

        Self {
            client,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }
}

#[async_trait]
impl Forwarder for HttpForwarder {
    async fn forward(&self, request: ForwardRequest) -> Result<ForwardResult, ForwardError> {
        let url = request.url();

        let uri: Uri = url.parse().map_err(|e: axum::http::uri::InvalidUri| ForwardError::Request {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = Request::builder().method(request.method).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            *headers = request.headers;
        }
        let body = match request.body {
            Some(bytes) => Body::from(bytes),
            None => Body::empty(),
        };
        let outbound = builder.body(body).map_err(|e| ForwardError::Request {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        let call = async {
            let response: Response<Incoming> = self
                .client
                .request(outbound)
                .await
                .map_err(|e| classify(&url, &e))?;

            let (parts, incoming) = response.into_parts();
            let body = axum::body::to_bytes(Body::new(incoming), usize::MAX)
                .await
                .map_err(|e| ForwardError::Request {
                    url: url.clone(),
                    reason: format!("reading response body: {}", describe(&e)),
                })?;

            Ok(ForwardResult {
                status: parts.status,
                headers: parts.headers,
                body,
            })
        };

        match tokio::time::timeout(self.request_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ForwardError::Timeout {
                url: url.clone(),
                after: self.request_timeout,
            }),
        }
    }
}

fn classify(url: &str, err: &hyper_util::client::legacy::Error) -> ForwardError {
    if err.is_connect() {
        ForwardError::Connect {
            url: url.to_string(),
            reason: describe(err),
        }
    } else {
        ForwardError::Request {
            url: url.to_string(),
            reason: describe(err),
        }
    }
}

/// Render an error with its whole source chain.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}
