//! Fluent builders for messages.
//!
//! Builders apply the same normalization as the message setters, remember
//! the first input that fails to normalize, and validate the finished
//! message in `build()`. A built message is ready to send.
//!
//! # Builders
//!
//! - [`BasicMessageBuilder`] - messages with To, CC and BCC lists
//! - [`BulkMessageBuilder`] - templated messages with per-recipient merge data
//!
//! # Examples
//!
//! ```rust
//! use integrations_socketlabs::builders::BulkMessageBuilder;
//! use integrations_socketlabs::types::MergeData;
//!
//! let message = BulkMessageBuilder::new()
//!     .subject("Hello %%FirstName%%")
//!     .from("sender@example.com")
//!     .html_body("<p>Your color is %%Color%%</p>")
//!     .recipient("r1@example.com", "Recipient One", vec![MergeData::new("Color", "Blue")])
//!     .recipient("r2@example.com", "Recipient Two", vec![MergeData::new("Color", "Green")])
//!     .global_merge_data(("FirstName", "Friend"))
//!     .build()?;
//! # Ok::<(), integrations_socketlabs::error::SocketLabsError>(())
//! ```

macro_rules! content_builder_methods {
    () => {
        fn apply<F>(mut self, setter: F) -> Self
        where
            F: FnOnce(&mut Self) -> crate::error::SocketLabsResult<()>,
        {
            if self.error.is_none() {
                if let Err(e) = setter(&mut self) {
                    self.error = Some(e);
                }
            }
            self
        }

        /// Set the subject.
        pub fn subject(mut self, subject: impl Into<String>) -> Self {
            self.message.set_subject(subject);
            self
        }

        /// Set the sender.
        pub fn from(self, from: impl Into<Loose<EmailAddress>>) -> Self {
            self.apply(|b| b.message.set_from(from).map(|_| ()))
        }

        /// Set the reply-to address.
        pub fn reply_to(self, reply_to: impl Into<Loose<EmailAddress>>) -> Self {
            self.apply(|b| b.message.set_reply_to(reply_to).map(|_| ()))
        }

        /// Set the plain text body.
        pub fn text_body(mut self, body: impl Into<String>) -> Self {
            self.message.set_text_body(body);
            self
        }

        /// Set the HTML body.
        pub fn html_body(mut self, body: impl Into<String>) -> Self {
            self.message.set_html_body(body);
            self
        }

        /// Set the AMP body.
        pub fn amp_body(mut self, body: impl Into<String>) -> Self {
            self.message.set_amp_body(body);
            self
        }

        /// Use a stored template.
        pub fn api_template(mut self, template_id: u64) -> Self {
            self.message.set_api_template(template_id);
            self
        }

        /// Set the character set.
        pub fn char_set(mut self, char_set: impl Into<String>) -> Self {
            self.message.set_char_set(char_set);
            self
        }

        /// Set the message ID.
        pub fn message_id(mut self, message_id: impl Into<String>) -> Self {
            self.message.set_message_id(message_id);
            self
        }

        /// Set the mailing ID.
        pub fn mailing_id(mut self, mailing_id: impl Into<String>) -> Self {
            self.message.set_mailing_id(mailing_id);
            self
        }

        /// Add a custom header.
        pub fn custom_header(self, header: impl Into<Loose<CustomHeader>>) -> Self {
            self.apply(|b| b.message.add_custom_header(header).map(|_| ()))
        }

        /// Add an attachment.
        pub fn attachment(self, attachment: impl Into<Loose<Attachment>>) -> Self {
            self.apply(|b| b.message.add_attachment(attachment).map(|_| ()))
        }
    };
}

mod basic_builder;
mod bulk_builder;

pub use basic_builder::BasicMessageBuilder;
pub use bulk_builder::BulkMessageBuilder;
