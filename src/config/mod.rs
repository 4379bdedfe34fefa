//! Configuration module for the SocketLabs client.
//!
//! This module provides configuration types and builders for creating and
//! customizing the client, including:
//!
//! - Server ID and API key
//! - Endpoint override
//! - Request timeout and retry settings
//! - Optional proxy
//! - User agent customization

use secrecy::SecretString;
use std::time::Duration;
use url::Url;

pub mod error;
pub mod retry;

pub use error::ConfigError;
pub use retry::{RetryPolicy, MAX_RETRIES_LIMIT};

/// Production Injection API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://inject.socketlabs.com/api/v1/email";

/// Default per-attempt request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// User agent sent when none is configured.
pub fn default_user_agent() -> String {
    format!("integrations-socketlabs/{} (rust)", env!("CARGO_PKG_VERSION"))
}

/// Configuration for the SocketLabs client.
///
/// Shared immutably by every send made through a client.
#[derive(Clone)]
pub struct SocketLabsConfig {
    /// SocketLabs server ID.
    pub server_id: u64,

    /// Injection API key.
    pub api_key: SecretString,

    /// Injection endpoint.
    pub endpoint: Url,

    /// Timeout for each attempt.
    pub request_timeout: Duration,

    /// Retry behavior.
    pub retry_policy: RetryPolicy,

    /// Proxy all requests through this URL.
    pub proxy: Option<Url>,

    /// User-Agent header value.
    pub user_agent: String,
}

impl std::fmt::Debug for SocketLabsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketLabsConfig")
            .field("server_id", &self.server_id)
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .field("request_timeout", &self.request_timeout)
            .field("retry_policy", &self.retry_policy)
            .field("proxy", &self.proxy.as_ref().map(Url::as_str))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl SocketLabsConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_socketlabs::config::SocketLabsConfig;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = SocketLabsConfig::builder()
    ///     .server_id(12345)
    ///     .api_key("your-api-key")
    ///     .max_retries(2)
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> SocketLabsConfigBuilder {
        SocketLabsConfigBuilder::default()
    }

    /// Create a configuration with default settings.
    pub fn new(server_id: u64, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Self::builder().server_id(server_id).api_key(api_key).build()
    }
}

/// Builder for creating client configurations.
#[derive(Default)]
pub struct SocketLabsConfigBuilder {
    server_id: Option<u64>,
    api_key: Option<SecretString>,
    endpoint: Option<String>,
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    proxy: Option<String>,
    user_agent: Option<String>,
}

impl SocketLabsConfigBuilder {
    /// Set the server ID.
    pub fn server_id(mut self, server_id: u64) -> Self {
        self.server_id = Some(server_id);
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }

    /// Override the endpoint. A blank value keeps the default.
    ///
    /// # Example
    ///
    /// ```
    /// use integrations_socketlabs::config::SocketLabsConfig;
    ///
    /// let builder = SocketLabsConfig::builder()
    ///     .server_id(12345)
    ///     .api_key("key")
    ///     .endpoint("http://localhost:8080/api/v1/email");
    /// ```
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-attempt timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the per-attempt timeout in whole seconds.
    pub fn request_timeout_secs(self, seconds: u64) -> Self {
        self.request_timeout(Duration::from_secs(seconds))
    }

    /// Set the retry count (0 to 5).
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Route requests through a proxy.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingField`] when the server ID or API key is missing
    /// - [`ConfigError::Invalid`] when the server ID is zero, the retry count is
    ///   out of range, or the endpoint or proxy is not a valid URL
    pub fn build(self) -> Result<SocketLabsConfig, ConfigError> {
        let server_id = self.server_id.ok_or_else(|| ConfigError::missing("server_id"))?;
        if server_id == 0 {
            return Err(ConfigError::invalid("server_id must be greater than zero"));
        }

        let api_key = self.api_key.ok_or_else(|| ConfigError::missing("api_key"))?;

        let endpoint = match self.endpoint.as_deref().map(str::trim) {
            Some(endpoint) if !endpoint.is_empty() => endpoint,
            _ => DEFAULT_ENDPOINT,
        };
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ConfigError::invalid(format!("endpoint is not a valid URL: {}", e)))?;

        let proxy = self
            .proxy
            .as_deref()
            .map(str::trim)
            .filter(|proxy| !proxy.is_empty())
            .map(Url::parse)
            .transpose()
            .map_err(|e| ConfigError::invalid(format!("proxy is not a valid URL: {}", e)))?;

        let retry_policy = RetryPolicy::new(self.max_retries.unwrap_or(0))?;

        Ok(SocketLabsConfig {
            server_id,
            api_key,
            endpoint,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            retry_policy,
            proxy,
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_builder_with_required_fields() {
        let config = SocketLabsConfig::builder()
            .server_id(12345)
            .api_key("key")
            .build()
            .unwrap();

        assert_eq!(config.server_id, 12345);
        assert_eq!(config.api_key.expose_secret(), "key");
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.retry_policy.max_retries(), 0);
        assert!(config.proxy.is_none());
        assert!(config.user_agent.starts_with("integrations-socketlabs/"));
        assert!(config.user_agent.ends_with("(rust)"));
    }

    #[test]
    fn test_builder_with_custom_settings() {
        let config = SocketLabsConfig::builder()
            .server_id(1)
            .api_key("key")
            .endpoint("http://localhost:4566/email")
            .request_timeout_secs(5)
            .max_retries(5)
            .proxy("http://proxy.local:3128")
            .user_agent("MyApp/1.0")
            .build()
            .unwrap();

        assert_eq!(config.endpoint.as_str(), "http://localhost:4566/email");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.retry_policy.max_retries(), 5);
        assert_eq!(config.proxy.map(String::from), Some("http://proxy.local:3128/".to_string()));
        assert_eq!(config.user_agent, "MyApp/1.0");
    }

    #[test]
    fn test_blank_endpoint_keeps_default() {
        let config = SocketLabsConfig::builder()
            .server_id(1)
            .api_key("key")
            .endpoint("   ")
            .build()
            .unwrap();

        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_builder_missing_fields() {
        match SocketLabsConfig::builder().api_key("key").build() {
            Err(ConfigError::MissingField { field }) => assert_eq!(field, "server_id"),
            other => panic!("Expected MissingField error, got {:?}", other.map(|_| ())),
        }

        match SocketLabsConfig::builder().server_id(1).build() {
            Err(ConfigError::MissingField { field }) => assert_eq!(field, "api_key"),
            other => panic!("Expected MissingField error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_builder_rejects_invalid_values() {
        assert!(matches!(
            SocketLabsConfig::new(0, "key"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            SocketLabsConfig::builder().server_id(1).api_key("key").max_retries(6).build(),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            SocketLabsConfig::builder().server_id(1).api_key("key").proxy("not a url").build(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = SocketLabsConfig::new(1, "super-secret").unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
