//! Retry with exponential backoff around a single injection request.
//!
//! Attempts are strictly sequential. Only HTTP 500, 502, 503 and 504 and
//! timeout or connection failures are retried; anything else ends the send
//! on the first occurrence.

use std::sync::Arc;
use thiserror::Error;
use tokio::time::sleep;

use crate::config::RetryPolicy;
use crate::http::{HttpRequest, RawResponse, Transport, TransportError};

/// Statuses worth another attempt.
pub const RETRYABLE_STATUS_CODES: [u16; 4] = [500, 502, 503, 504];

/// Why a delivery ended without a 2xx response.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The server answered with a non-2xx status.
    #[error("HTTP status {}", .0.status)]
    Status(RawResponse),

    /// No response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl DeliveryError {
    /// Whether the failure qualifies for another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeliveryError::Status(response) => RETRYABLE_STATUS_CODES.contains(&response.status),
            DeliveryError::Transport(error) => error.is_retryable(),
        }
    }

    fn status(&self) -> Option<u16> {
        match self {
            DeliveryError::Status(response) => Some(response.status),
            DeliveryError::Transport(_) => None,
        }
    }
}

/// Sends a request through a transport, retrying per policy.
#[derive(Clone)]
pub struct RetryHandler {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryHandler {
    /// Create a handler.
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// The policy in use.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send the request, retrying retryable failures up to
    /// `policy.max_retries()` times.
    ///
    /// Resolves with the first 2xx response, or the last failure once the
    /// retries are used up.
    pub async fn send(&self, request: &HttpRequest) -> Result<RawResponse, DeliveryError> {
        let max_retries = self.policy.max_retries();
        let mut retry_number = 0;

        loop {
            let error = match self.transport.send(request).await {
                Ok(response) if response.is_success() => return Ok(response),
                Ok(response) => DeliveryError::Status(response),
                Err(e) => DeliveryError::Transport(e),
            };

            if !error.is_retryable() || retry_number >= max_retries {
                return Err(error);
            }

            retry_number += 1;
            let delay = self.policy.next_wait_interval(retry_number);
            tracing::warn!(
                attempt = retry_number + 1,
                max_retries = max_retries,
                delay_ms = delay.as_millis() as u64,
                status = ?error.status(),
                error = %error,
                "Retrying injection request after failure"
            );

            sleep(delay).await;
        }
    }
}

impl std::fmt::Debug for RetryHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryHandler")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
