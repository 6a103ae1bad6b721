//! Retry logic.
//!
//! # Responsibilities
//! - Determine if a failed attempt is retryable
//! - Execute retries with exponential backoff
//! - Bound the number of attempts per request
//!
//! # Design Decisions
//! - Connect errors never reached the backend, so any method is retried
//! - Timeouts, mid-request failures and retry statuses: idempotent methods only
//! - The last failure (or response) is returned unchanged when attempts run out

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::Method;

use crate::config::schema::ResilienceConfig;
use crate::forward::{ForwardError, ForwardRequest, ForwardResult, Forwarder};
use crate::observability::metrics;
use crate::resilience::backoff::calculate_backoff;

/// Whether the outcome of an attempt should be retried.
pub fn is_retryable(
    method: &Method,
    outcome: &Result<ForwardResult, ForwardError>,
    retry_on_status: &[u16],
) -> bool {
    match outcome {
        Err(ForwardError::Connect { .. }) => true,
        Err(ForwardError::Timeout { .. } | ForwardError::Request { .. }) => method.is_idempotent(),
        Ok(result) => method.is_idempotent() && retry_on_status.contains(&result.status.as_u16()),
    }
}

/// Retries the inner forwarder with exponential backoff.
pub struct RetryingForwarder {
    inner: Arc<dyn Forwarder>,
    route: String,
    max_attempts: u32,
    base_delay: Duration,
    delay_factor: u32,
    max_delay: Duration,
    retry_on_status: Vec<u16>,
}

impl RetryingForwarder {
    /// Wrap `inner` with the route's resilience settings.
    pub fn new(inner: Arc<dyn Forwarder>, route: &str, config: &ResilienceConfig) -> Self {
        Self {
            inner,
            route: route.to_string(),
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.delay_ms),
            delay_factor: config.delay_factor.max(1),
            max_delay: Duration::from_millis(config.max_delay_ms),
            retry_on_status: config.retry_on_status.clone(),
        }
    }
}

#[async_trait]
impl Forwarder for RetryingForwarder {
    async fn forward(&self, request: ForwardRequest) -> Result<ForwardResult, ForwardError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let outcome = self.inner.forward(request.clone()).await;

            if attempt >= self.max_attempts
                || !is_retryable(&request.method, &outcome, &self.retry_on_status)
            {
                return outcome;
            }

            let delay = calculate_backoff(attempt, self.base_delay, self.delay_factor, self.max_delay);
            match &outcome {
                Err(e) => tracing::info!(
                    route = %self.route,
                    attempt,
                    delay = ?delay,
                    error = %e,
                    "Retrying after transport error"
                ),
                Ok(result) => tracing::info!(
                    route = %self.route,
                    attempt,
                    delay = ?delay,
                    status = %result.status,
                    "Retrying after backend status"
                ),
            }
            metrics::record_retry(&self.route);
            tokio::time::sleep(delay).await;
        }
    }
}
