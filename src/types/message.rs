//! Basic and bulk message types.
//!
//! Both message kinds share one set of content fields ([`MessageContent`]) and
//! the same scalar and normalized setters. Scalar setters treat an empty
//! subject or body, and a blank ID or char set, as "not provided". Normalized setters accept anything convertible into
//! [`Loose`] and fail with the normalizer's error when the shape is not
//! supported.
//!
//! # Examples
//!
//! ```rust
//! use integrations_socketlabs::types::{BasicMessage, EmailAddress};
//! use serde_json::json;
//!
//! # fn example() -> Result<(), integrations_socketlabs::error::SocketLabsError> {
//! let mut message = BasicMessage::new();
//! message
//!     .set_subject("Hi")
//!     .set_html_body("<p>Hello</p>");
//! message
//!     .set_from("sender@example.com")?
//!     .add_to(EmailAddress::with_name("a@example.com", "A"))?
//!     .extend_to(json!(["b@example.com", {"emailAddress": "c@example.com"}]))?;
//!
//! assert_eq!(message.to.len(), 3);
//! # Ok(())
//! # }
//! ```

use serde_json::Value;
use std::fmt;

use super::address::{BulkRecipient, EmailAddress};
use super::attachment::Attachment;
use super::fields::{CustomHeader, MergeData, Metadata};
use super::response::SendResponse;
use crate::error::SocketLabsResult;
use crate::normalize::{check_global_keys, normalize, normalize_list, Loose};
use crate::validation;

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Content fields shared by basic and bulk messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageContent {
    /// Subject line. May contain merge placeholders in bulk messages.
    pub subject: Option<String>,
    /// Sender address.
    pub from: Option<EmailAddress>,
    /// Reply-to address.
    pub reply_to: Option<EmailAddress>,
    /// Plain text body.
    pub text_body: Option<String>,
    /// HTML body.
    pub html_body: Option<String>,
    /// AMP HTML body.
    pub amp_body: Option<String>,
    /// Stored template rendered by the service instead of inline bodies.
    pub api_template: Option<u64>,
    /// Character set of the bodies.
    pub char_set: Option<String>,
    /// Caller-assigned message ID, reported back in tracking data.
    pub message_id: Option<String>,
    /// Caller-assigned mailing ID, reported back in tracking data.
    pub mailing_id: Option<String>,
    /// Extra headers added to the message.
    pub custom_headers: Vec<CustomHeader>,
    /// Attached files.
    pub attachments: Vec<Attachment>,
}

macro_rules! content_setters {
    ($message:ty) => {
        impl $message {
            /// Set the subject. An empty string clears it.
            pub fn set_subject(&mut self, subject: impl Into<String>) -> &mut Self {
                self.content.subject = non_empty(subject.into());
                self
            }

            /// Set the plain text body.
            pub fn set_text_body(&mut self, body: impl Into<String>) -> &mut Self {
                self.content.text_body = non_empty(body.into());
                self
            }

            /// Set the HTML body.
            pub fn set_html_body(&mut self, body: impl Into<String>) -> &mut Self {
                self.content.html_body = non_empty(body.into());
                self
            }

            /// Set the AMP body.
            pub fn set_amp_body(&mut self, body: impl Into<String>) -> &mut Self {
                self.content.amp_body = non_empty(body.into());
                self
            }

            /// Use a stored template. Zero clears it.
            pub fn set_api_template(&mut self, template_id: u64) -> &mut Self {
                self.content.api_template = Some(template_id).filter(|id| *id > 0);
                self
            }

            /// Set the character set.
            pub fn set_char_set(&mut self, char_set: impl Into<String>) -> &mut Self {
                self.content.char_set = non_blank(char_set.into());
                self
            }

            /// Set the message ID.
            pub fn set_message_id(&mut self, message_id: impl Into<String>) -> &mut Self {
                self.content.message_id = non_blank(message_id.into());
                self
            }

            /// Set the mailing ID.
            pub fn set_mailing_id(&mut self, mailing_id: impl Into<String>) -> &mut Self {
                self.content.mailing_id = non_blank(mailing_id.into());
                self
            }

            /// Set the sender.
            pub fn set_from(&mut self, from: impl Into<Loose<EmailAddress>>) -> SocketLabsResult<&mut Self> {
                self.content.from = Some(normalize(from)?);
                Ok(self)
            }

            /// Set the reply-to address. A blank address clears it.
            pub fn set_reply_to(&mut self, reply_to: impl Into<Loose<EmailAddress>>) -> SocketLabsResult<&mut Self> {
                let reply_to: EmailAddress = normalize(reply_to)?;
                self.content.reply_to = if reply_to.is_blank() { None } else { Some(reply_to) };
                Ok(self)
            }

            /// Append a custom header.
            pub fn add_custom_header(&mut self, header: impl Into<Loose<CustomHeader>>) -> SocketLabsResult<&mut Self> {
                self.content.custom_headers.push(normalize(header)?);
                Ok(self)
            }

            /// Append custom headers from a JSON value holding one header or an array.
            pub fn extend_custom_headers(&mut self, headers: Value) -> SocketLabsResult<&mut Self> {
                self.content.custom_headers.extend(normalize_list::<CustomHeader>(headers)?);
                Ok(self)
            }

            /// Append an attachment.
            pub fn add_attachment(&mut self, attachment: impl Into<Loose<Attachment>>) -> SocketLabsResult<&mut Self> {
                self.content.attachments.push(normalize(attachment)?);
                Ok(self)
            }

            /// Append attachments from a JSON value holding one attachment or an array.
            pub fn extend_attachments(&mut self, attachments: Value) -> SocketLabsResult<&mut Self> {
                self.content.attachments.extend(normalize_list::<Attachment>(attachments)?);
                Ok(self)
            }

            /// The shared content fields.
            pub fn content(&self) -> &MessageContent {
                &self.content
            }

            /// Mutable access to the shared content fields.
            pub fn content_mut(&mut self) -> &mut MessageContent {
                &mut self.content
            }
        }
    };
}

/// Discriminates the two message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Explicit To/CC/BCC lists with shared content.
    Basic,
    /// One template personalized per recipient through merge data.
    Bulk,
}

impl MessageType {
    /// Lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Basic => "basic",
            MessageType::Bulk => "bulk",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message with explicit To, CC and BCC recipient lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicMessage {
    /// Shared content fields.
    pub content: MessageContent,
    /// To recipients.
    pub to: Vec<EmailAddress>,
    /// CC recipients.
    pub cc: Vec<EmailAddress>,
    /// BCC recipients.
    pub bcc: Vec<EmailAddress>,
}

content_setters!(BasicMessage);

impl BasicMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a To recipient.
    pub fn add_to(&mut self, address: impl Into<Loose<EmailAddress>>) -> SocketLabsResult<&mut Self> {
        self.to.push(normalize(address)?);
        Ok(self)
    }

    /// Append a To recipient from an address and a friendly name.
    pub fn add_to_address(&mut self, email_address: impl Into<String>, friendly_name: impl Into<String>) -> &mut Self {
        self.to.push(EmailAddress::with_name(email_address, friendly_name));
        self
    }

    /// Append To recipients from a JSON value holding one address or an array.
    pub fn extend_to(&mut self, addresses: Value) -> SocketLabsResult<&mut Self> {
        self.to.extend(normalize_list::<EmailAddress>(addresses)?);
        Ok(self)
    }

    /// Append a CC recipient.
    pub fn add_cc(&mut self, address: impl Into<Loose<EmailAddress>>) -> SocketLabsResult<&mut Self> {
        self.cc.push(normalize(address)?);
        Ok(self)
    }

    /// Append CC recipients from a JSON value holding one address or an array.
    pub fn extend_cc(&mut self, addresses: Value) -> SocketLabsResult<&mut Self> {
        self.cc.extend(normalize_list::<EmailAddress>(addresses)?);
        Ok(self)
    }

    /// Append a BCC recipient.
    pub fn add_bcc(&mut self, address: impl Into<Loose<EmailAddress>>) -> SocketLabsResult<&mut Self> {
        self.bcc.push(normalize(address)?);
        Ok(self)
    }

    /// Append BCC recipients from a JSON value holding one address or an array.
    pub fn extend_bcc(&mut self, addresses: Value) -> SocketLabsResult<&mut Self> {
        self.bcc.extend(normalize_list::<EmailAddress>(addresses)?);
        Ok(self)
    }

    /// Combined To, CC and BCC count.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }

    /// All recipients in To, CC, BCC order.
    pub fn recipients(&self) -> impl Iterator<Item = &EmailAddress> {
        self.to.iter().chain(&self.cc).chain(&self.bcc)
    }
}

/// A templated message personalized per recipient through merge data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkMessage {
    /// Shared content fields.
    pub content: MessageContent,
    /// Recipients, each with its own merge data.
    pub to: Vec<BulkRecipient>,
    /// Merge data applied to every recipient.
    pub global_merge_data: Vec<MergeData>,
    /// Metadata attached to the message.
    pub metadata: Vec<Metadata>,
    /// Tags attached to the message.
    pub tags: Vec<String>,
}

content_setters!(BulkMessage);

impl BulkMessage {
    /// Create an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recipient.
    pub fn add_to(&mut self, recipient: impl Into<Loose<BulkRecipient>>) -> SocketLabsResult<&mut Self> {
        self.to.push(normalize(recipient)?);
        Ok(self)
    }

    /// Append a recipient from its parts.
    pub fn add_to_recipient(
        &mut self,
        email_address: impl Into<String>,
        friendly_name: impl Into<String>,
        merge_data: Vec<MergeData>,
    ) -> SocketLabsResult<&mut Self> {
        let recipient = BulkRecipient::with_name(email_address, friendly_name).with_merge_data(merge_data);
        self.add_to(recipient)
    }

    /// Append recipients from a JSON value holding one recipient or an array.
    pub fn extend_to(&mut self, recipients: Value) -> SocketLabsResult<&mut Self> {
        self.to.extend(normalize_list::<BulkRecipient>(recipients)?);
        Ok(self)
    }

    /// Append a global merge data pair.
    ///
    /// Fails when the key collides case-insensitively with one already set.
    pub fn add_global_merge_data(&mut self, merge_data: impl Into<Loose<MergeData>>) -> SocketLabsResult<&mut Self> {
        let mut merged = self.global_merge_data.clone();
        merged.push(normalize(merge_data)?);
        check_global_keys(&merged)?;
        self.global_merge_data = merged;
        Ok(self)
    }

    /// Append global merge data from a JSON value holding one pair or an array.
    pub fn extend_global_merge_data(&mut self, merge_data: Value) -> SocketLabsResult<&mut Self> {
        let mut merged = self.global_merge_data.clone();
        merged.extend(normalize_list::<MergeData>(merge_data)?);
        check_global_keys(&merged)?;
        self.global_merge_data = merged;
        Ok(self)
    }

    /// Append a metadata pair.
    pub fn add_metadata(&mut self, metadata: impl Into<Loose<Metadata>>) -> SocketLabsResult<&mut Self> {
        self.metadata.push(normalize(metadata)?);
        Ok(self)
    }

    /// Append metadata from a JSON value holding one pair or an array.
    pub fn extend_metadata(&mut self, metadata: Value) -> SocketLabsResult<&mut Self> {
        self.metadata.extend(normalize_list::<Metadata>(metadata)?);
        Ok(self)
    }

    /// Append a tag. Blank tags are ignored.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> &mut Self {
        if let Some(tag) = non_blank(tag.into()) {
            self.tags.push(tag);
        }
        self
    }

    /// Append tags.
    pub fn extend_tags<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.add_tag(tag);
        }
        self
    }
}

/// Either kind of message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A basic message.
    Basic(BasicMessage),
    /// A bulk message.
    Bulk(BulkMessage),
}

impl Message {
    /// Which kind of message this is.
    pub fn message_type(&self) -> MessageType {
        match self {
            Message::Basic(_) => MessageType::Basic,
            Message::Bulk(_) => MessageType::Bulk,
        }
    }

    /// The shared content fields.
    pub fn content(&self) -> &MessageContent {
        match self {
            Message::Basic(message) => &message.content,
            Message::Bulk(message) => &message.content,
        }
    }

    /// Check the message against the service's acceptance rules.
    pub fn validate(&self) -> SendResponse {
        validation::validate_message(self)
    }
}

impl From<BasicMessage> for Message {
    fn from(message: BasicMessage) -> Self {
        Message::Basic(message)
    }
}

impl From<BulkMessage> for Message {
    fn from(message: BulkMessage) -> Self {
        Message::Bulk(message)
    }
}
