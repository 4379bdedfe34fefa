//! Builder for basic messages.

use serde_json::Value;

use crate::error::{SocketLabsError, SocketLabsResult};
use crate::normalize::Loose;
use crate::types::{Attachment, BasicMessage, CustomHeader, EmailAddress};
use crate::validation::validate_basic;

/// Builder for [`BasicMessage`] with a fluent API.
///
/// # Examples
///
/// ```rust
/// use integrations_socketlabs::builders::BasicMessageBuilder;
/// use integrations_socketlabs::types::EmailAddress;
///
/// let message = BasicMessageBuilder::new()
///     .subject("Meeting Invitation")
///     .from(EmailAddress::with_name("sender@example.com", "Sender"))
///     .to("recipient1@example.com")
///     .to_address("recipient2@example.com", "Recipient Two")
///     .cc("cc@example.com")
///     .bcc("bcc@example.com")
///     .reply_to("replyto@example.com")
///     .html_body("<p>You're invited to our meeting</p>")
///     .build()?;
///
/// assert_eq!(message.recipient_count(), 4);
/// # Ok::<(), integrations_socketlabs::error::SocketLabsError>(())
/// ```
#[derive(Debug, Default)]
pub struct BasicMessageBuilder {
    message: BasicMessage,
    error: Option<SocketLabsError>,
}

impl BasicMessageBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    content_builder_methods!();

    /// Add a To recipient.
    pub fn to(self, address: impl Into<Loose<EmailAddress>>) -> Self {
        self.apply(|b| b.message.add_to(address).map(|_| ()))
    }

    /// Add a To recipient from an address and a friendly name.
    pub fn to_address(mut self, email_address: impl Into<String>, friendly_name: impl Into<String>) -> Self {
        self.message.add_to_address(email_address, friendly_name);
        self
    }

    /// Add To recipients from a JSON value holding one address or an array.
    pub fn to_list(self, addresses: Value) -> Self {
        self.apply(|b| b.message.extend_to(addresses).map(|_| ()))
    }

    /// Add a CC recipient.
    pub fn cc(self, address: impl Into<Loose<EmailAddress>>) -> Self {
        self.apply(|b| b.message.add_cc(address).map(|_| ()))
    }

    /// Add CC recipients from a JSON value holding one address or an array.
    pub fn cc_list(self, addresses: Value) -> Self {
        self.apply(|b| b.message.extend_cc(addresses).map(|_| ()))
    }

    /// Add a BCC recipient.
    pub fn bcc(self, address: impl Into<Loose<EmailAddress>>) -> Self {
        self.apply(|b| b.message.add_bcc(address).map(|_| ()))
    }

    /// Add BCC recipients from a JSON value holding one address or an array.
    pub fn bcc_list(self, addresses: Value) -> Self {
        self.apply(|b| b.message.extend_bcc(addresses).map(|_| ()))
    }

    /// Build and validate the message.
    ///
    /// # Errors
    ///
    /// Returns the first normalization error recorded while building, or
    /// [`SocketLabsError::Rejected`] when the message fails validation.
    pub fn build(self) -> SocketLabsResult<BasicMessage> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let validation = validate_basic(&self.message);
        if !validation.is_success() {
            return Err(SocketLabsError::Rejected(validation));
        }

        Ok(self.message)
    }
}
