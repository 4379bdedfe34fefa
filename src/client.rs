//! SocketLabs client implementation.
//!
//! [`SocketLabsClient::send`] runs one message through the whole pipeline:
//! credential check, validation, serialization, delivery with retry, and
//! response parsing. Only configuration is shared between concurrent sends.
//!
//! # Example
//!
//! ```rust,no_run
//! use integrations_socketlabs::{BasicMessageBuilder, SocketLabsClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SocketLabsClient::builder()
//!     .server_id(12345)
//!     .api_key("your-api-key")
//!     .max_retries(2)
//!     .build()?;
//!
//! let message = BasicMessageBuilder::new()
//!     .subject("Hello")
//!     .from("sender@example.com")
//!     .to("recipient@example.com")
//!     .html_body("<p>Hello</p>")
//!     .build()?;
//!
//! let response = client.send(message).await?;
//! println!("Accepted: {:?}", response.transaction_receipt);
//! # Ok(())
//! # }
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigError, SocketLabsConfig, SocketLabsConfigBuilder};
use crate::error::{SocketLabsError, SocketLabsResult};
use crate::http::{parse_response, parse_transport_error, HttpRequest, ReqwestTransport, Transport};
use crate::retry::{DeliveryError, RetryHandler};
use crate::types::{Message, SendResponse};
use crate::validation::{parse_api_key, validate_credentials};
use crate::wire::InjectionRequest;

/// Client for the SocketLabs Injection API.
///
/// Cheap to clone; clones share configuration and transport.
#[derive(Clone, Debug)]
pub struct SocketLabsClient {
    config: Arc<SocketLabsConfig>,
    retry_handler: RetryHandler,
}

impl SocketLabsClient {
    /// Create a client with default settings.
    pub fn new(server_id: u64, api_key: impl Into<String>) -> SocketLabsResult<Self> {
        Self::with_config(SocketLabsConfig::new(server_id, api_key)?)
    }

    /// Create a client from a configuration, using the reqwest transport.
    pub fn with_config(config: SocketLabsConfig) -> SocketLabsResult<Self> {
        let transport = ReqwestTransport::new(config.request_timeout, config.proxy.as_ref())
            .map_err(|e| ConfigError::invalid(e.to_string()))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client that sends through the given transport.
    pub fn with_transport(config: SocketLabsConfig, transport: Arc<dyn Transport>) -> Self {
        let retry_handler = RetryHandler::new(transport, config.retry_policy.clone());
        Self {
            config: Arc::new(config),
            retry_handler,
        }
    }

    /// Create a client builder.
    pub fn builder() -> SocketLabsClientBuilder {
        SocketLabsClientBuilder::default()
    }

    /// The client's configuration.
    pub fn config(&self) -> &SocketLabsConfig {
        &self.config
    }

    /// Send a basic or bulk message.
    ///
    /// # Errors
    ///
    /// - [`SocketLabsError::Rejected`] for every non-success outcome:
    ///   credential or message validation failures (no request is made),
    ///   error codes reported by the service, non-2xx statuses, and transport
    ///   failures once retries are exhausted
    /// - [`SocketLabsError::DuplicateMergeKeys`] or
    ///   [`SocketLabsError::Serialization`] when the request cannot be built
    pub async fn send(&self, message: impl Into<Message>) -> SocketLabsResult<SendResponse> {
        let message = message.into();
        let api_key = self.config.api_key.expose_secret();

        let credentials = validate_credentials(self.config.server_id, api_key);
        if !credentials.is_success() {
            return Err(SocketLabsError::Rejected(credentials));
        }

        let validation = message.validate();
        if !validation.is_success() {
            return Err(SocketLabsError::Rejected(validation));
        }

        let (body_key, bearer_token) = if parse_api_key(api_key).is_success() {
            (String::new(), Some(SecretString::new(api_key.to_string())))
        } else {
            (api_key.to_string(), None)
        };

        let body = InjectionRequest::new(self.config.server_id, body_key, &message)?.to_body()?;
        let request = HttpRequest {
            url: self.config.endpoint.clone(),
            user_agent: self.config.user_agent.clone(),
            bearer_token,
            body,
        };

        tracing::debug!(
            message_type = %message.message_type(),
            body_bytes = request.body.len(),
            bearer = request.bearer_token.is_some(),
            "Dispatching injection request"
        );

        let response = match self.retry_handler.send(&request).await {
            Ok(raw) => parse_response(&raw),
            Err(DeliveryError::Status(raw)) => parse_response(&raw),
            Err(DeliveryError::Transport(e)) => parse_transport_error(&e),
        };

        tracing::debug!(
            result = %response.result,
            status = ?response.status,
            address_results = response.address_results.len(),
            "Injection request completed"
        );

        if response.is_success() {
            Ok(response)
        } else {
            Err(SocketLabsError::Rejected(response))
        }
    }
}

/// Builder for [`SocketLabsClient`].
#[derive(Default)]
pub struct SocketLabsClientBuilder {
    config: SocketLabsConfigBuilder,
    transport: Option<Arc<dyn Transport>>,
}

impl SocketLabsClientBuilder {
    /// Set the server ID.
    pub fn server_id(mut self, server_id: u64) -> Self {
        self.config = self.config.server_id(server_id);
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config = self.config.api_key(api_key);
        self
    }

    /// Override the endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config = self.config.endpoint(endpoint);
        self
    }

    /// Set the per-attempt timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.request_timeout(timeout);
        self
    }

    /// Set the retry count (0 to 5).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config = self.config.max_retries(retries);
        self
    }

    /// Route requests through a proxy.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.config = self.config.proxy(proxy);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config = self.config.user_agent(ua);
        self
    }

    /// Send through a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(self) -> SocketLabsResult<SocketLabsClient> {
        let config = self.config.build()?;
        match self.transport {
            Some(transport) => Ok(SocketLabsClient::with_transport(config, transport)),
            None => SocketLabsClient::with_config(config),
        }
    }
}
