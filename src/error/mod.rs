//! Error types for the SocketLabs integration module.
//!
//! Errors fall into three groups:
//! - Assembly errors raised while a message is being built (unsupported input
//!   shapes, duplicate merge keys, unreadable attachments)
//! - Configuration errors raised while a client is being constructed
//! - Rejections, which carry a typed [`SendResponse`] describing why a message
//!   was not accepted (client-side validation, server response, or transport
//!   failure once retries are exhausted)
//!
//! # Examples
//!
//! ```rust
//! use integrations_socketlabs::error::SocketLabsError;
//!
//! fn describe(error: &SocketLabsError) -> String {
//!     match error.send_response() {
//!         Some(response) => format!("rejected with {}", response.result),
//!         None => error.to_string(),
//!     }
//! }
//! ```

use thiserror::Error;

use crate::config::ConfigError;
use crate::types::SendResponse;

/// Result type alias for SocketLabs operations.
pub type SocketLabsResult<T> = Result<T, SocketLabsError>;

/// Top-level error type for the SocketLabs integration.
#[derive(Debug, Error)]
pub enum SocketLabsError {
    /// A caller-supplied value had a shape the normalizer does not accept.
    ///
    /// Raised for numbers, booleans, arrays or `null` where an entity was
    /// expected, and for recognized fields holding the wrong JSON type.
    #[error("Invalid {kind}: {message}")]
    InvalidInputFormat {
        /// The entity being normalized (e.g. "email address").
        kind: &'static str,
        /// Description of the offending shape.
        message: String,
    },

    /// Merge data keys collided when compared case-insensitively.
    #[error("Invalid {scope}: duplicate merge data keys: {}", keys.join(", "))]
    DuplicateMergeKeys {
        /// Where the collision happened ("global merge data" or the recipient address).
        scope: String,
        /// The lower-cased keys that appear more than once.
        keys: Vec<String>,
    },

    /// An attachment could not be assembled.
    #[error("Attachment error: {message}")]
    Attachment {
        /// Description of the attachment problem.
        message: String,
        /// Optional underlying error source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Client configuration was missing or out of range.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// Serializing the injection request failed.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },

    /// The message was not accepted.
    ///
    /// The response carries the result code and, for address failures, the
    /// per-address outcomes.
    #[error("Message rejected: {0}")]
    Rejected(SendResponse),
}

impl SocketLabsError {
    pub(crate) fn invalid_input(kind: &'static str, message: impl Into<String>) -> Self {
        SocketLabsError::InvalidInputFormat {
            kind,
            message: message.into(),
        }
    }

    /// Returns the send response if this error is a rejection.
    pub fn send_response(&self) -> Option<&SendResponse> {
        match self {
            SocketLabsError::Rejected(response) => Some(response),
            _ => None,
        }
    }

    /// Consumes the error and returns the send response if it is a rejection.
    pub fn into_send_response(self) -> Option<SendResponse> {
        match self {
            SocketLabsError::Rejected(response) => Some(response),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SocketLabsError {
    fn from(err: serde_json::Error) -> Self {
        SocketLabsError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<SendResponse> for SocketLabsError {
    fn from(response: SendResponse) -> Self {
        SocketLabsError::Rejected(response)
    }
}
