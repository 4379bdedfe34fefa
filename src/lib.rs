//! SocketLabs Injection API Integration Module
//!
//! Type-safe client for sending basic and bulk email through the SocketLabs
//! Injection API.
//!
//! # Features
//!
//! - **Flexible input**: addresses, headers, merge data and attachments accept
//!   typed values, plain strings or JSON objects
//! - **Client-side validation**: messages are checked before any network call
//! - **Bulk merge data**: per-recipient substitution with the service's
//!   placeholder wire format
//! - **Resilience**: automatic retry with exponential backoff and jitter
//! - **Total result mapping**: every outcome is reported as a [`SendResponse`]
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use integrations_socketlabs::{BasicMessageBuilder, SocketLabsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SocketLabsClient::new(12345, "your-api-key")?;
//!
//!     let message = BasicMessageBuilder::new()
//!         .subject("Hello from SocketLabs")
//!         .from("sender@example.com")
//!         .to("recipient@example.com")
//!         .text_body("This is a test email.")
//!         .build()?;
//!
//!     let response = client.send(message).await?;
//!     println!("Accepted: {:?}", response.transaction_receipt);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Bulk Messages
//!
//! ```rust,no_run
//! use integrations_socketlabs::{BulkMessageBuilder, SocketLabsClient};
//! use integrations_socketlabs::types::MergeData;
//!
//! # async fn example(client: &SocketLabsClient) -> Result<(), Box<dyn std::error::Error>> {
//! let message = BulkMessageBuilder::new()
//!     .subject("Hello %%Name%%")
//!     .from("sender@example.com")
//!     .html_body("<p>Hi %%Name%%, your code is %%Code%%</p>")
//!     .recipient("a@example.com", "Ann", vec![MergeData::new("Name", "Ann"), MergeData::new("Code", "A1")])
//!     .recipient("b@example.com", "Bob", vec![MergeData::new("Name", "Bob"), MergeData::new("Code", "B2")])
//!     .build()?;
//!
//! client.send(message).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Every non-success outcome of a send, including local validation failures
//! and transport errors, surfaces as [`SocketLabsError::Rejected`] carrying
//! the [`SendResponse`]:
//!
//! ```rust,no_run
//! use integrations_socketlabs::{SocketLabsClient, SocketLabsError, BasicMessage};
//!
//! # async fn example(client: &SocketLabsClient, message: BasicMessage) {
//! match client.send(message).await {
//!     Ok(response) => println!("Sent: {}", response),
//!     Err(SocketLabsError::Rejected(response)) => {
//!         eprintln!("{}: {}", response.result, response.result.message());
//!         for address in &response.address_results {
//!             eprintln!("  {} {:?}", address.email_address, address.error_code);
//!         }
//!     }
//!     Err(e) => eprintln!("Could not build request: {}", e),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builders;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod normalize;
pub mod retry;
pub mod types;
pub mod validation;
pub mod wire;

pub use builders::{BasicMessageBuilder, BulkMessageBuilder};
pub use client::{SocketLabsClient, SocketLabsClientBuilder};
pub use config::{ConfigError, RetryPolicy, SocketLabsConfig, SocketLabsConfigBuilder};
pub use error::{SocketLabsError, SocketLabsResult};
pub use normalize::Loose;
pub use types::{
    AddressResult, Attachment, BasicMessage, BulkMessage, BulkRecipient, CustomHeader,
    EmailAddress, MergeData, Message, Metadata, SendResponse, SendResult,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let _ = BasicMessageBuilder::new();
        let _ = BulkMessageBuilder::new();
        let _ = RetryPolicy::default();
        let _ = SendResult::Success;
    }
}
