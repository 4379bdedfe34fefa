//! Builder for bulk messages.

use serde_json::Value;

use crate::error::{SocketLabsError, SocketLabsResult};
use crate::normalize::Loose;
use crate::types::{
    Attachment, BulkMessage, BulkRecipient, CustomHeader, EmailAddress, MergeData, Metadata,
};
use crate::validation::validate_bulk;

/// Builder for [`BulkMessage`] with a fluent API.
///
/// Recipients carry their own merge data; the service substitutes it into
/// `%%Key%%` placeholders in the subject and bodies.
#[derive(Debug, Default)]
pub struct BulkMessageBuilder {
    message: BulkMessage,
    error: Option<SocketLabsError>,
}

impl BulkMessageBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    content_builder_methods!();

    /// Add a recipient in any accepted shape.
    pub fn to(self, recipient: impl Into<Loose<BulkRecipient>>) -> Self {
        self.apply(|b| b.message.add_to(recipient).map(|_| ()))
    }

    /// Add a recipient from its parts.
    pub fn recipient(
        self,
        email_address: impl Into<String>,
        friendly_name: impl Into<String>,
        merge_data: Vec<MergeData>,
    ) -> Self {
        self.apply(|b| {
            b.message
                .add_to_recipient(email_address, friendly_name, merge_data)
                .map(|_| ())
        })
    }

    /// Add recipients from a JSON value holding one recipient or an array.
    pub fn to_list(self, recipients: Value) -> Self {
        self.apply(|b| b.message.extend_to(recipients).map(|_| ()))
    }

    /// Add a global merge data pair.
    pub fn global_merge_data(self, merge_data: impl Into<Loose<MergeData>>) -> Self {
        self.apply(|b| b.message.add_global_merge_data(merge_data).map(|_| ()))
    }

    /// Add global merge data from a JSON value holding one pair or an array.
    pub fn global_merge_data_list(self, merge_data: Value) -> Self {
        self.apply(|b| b.message.extend_global_merge_data(merge_data).map(|_| ()))
    }

    /// Add a metadata pair.
    pub fn metadata(self, metadata: impl Into<Loose<Metadata>>) -> Self {
        self.apply(|b| b.message.add_metadata(metadata).map(|_| ()))
    }

    /// Add metadata from a JSON value holding one pair or an array.
    pub fn metadata_list(self, metadata: Value) -> Self {
        self.apply(|b| b.message.extend_metadata(metadata).map(|_| ()))
    }

    /// Add a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.message.add_tag(tag);
        self
    }

    /// Add several tags. Blank tags are skipped.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.message.extend_tags(tags);
        self
    }

    /// Build and validate the message.
    ///
    /// # Errors
    ///
    /// Returns the first normalization error recorded while building, or
    /// [`SocketLabsError::Rejected`] when the message fails validation.
    pub fn build(self) -> SocketLabsResult<BulkMessage> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let validation = validate_bulk(&self.message);
        if !validation.is_success() {
            return Err(SocketLabsError::Rejected(validation));
        }

        Ok(self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SendResult;
    use serde_json::json;

    fn base() -> BulkMessageBuilder {
        BulkMessageBuilder::new()
            .subject("Hi %%Name%%")
            .from("a@example.com")
            .text_body("Hello %%Name%%")
    }

    #[test]
    fn test_build_bulk_message() {
        let message = base()
            .recipient("r1@example.com", "One", vec![MergeData::new("Name", "One")])
            .to(json!({
                "emailAddress": "r2@example.com",
                "mergeData": [{"key": "Name", "value": "Two"}]
            }))
            .global_merge_data(("Sender", "Acme"))
            .metadata(("campaign", "spring"))
            .metadata_list(json!([{"key": "source", "value": "web"}]))
            .tag("newsletter")
            .tags(["", "weekly"])
            .build()
            .unwrap();

        assert_eq!(message.to.len(), 2);
        assert_eq!(message.to[1].merge_data, vec![MergeData::new("Name", "Two")]);
        assert_eq!(message.global_merge_data, vec![MergeData::new("Sender", "Acme")]);
        assert_eq!(
            message.metadata,
            vec![Metadata::new("campaign", "spring"), Metadata::new("source", "web")]
        );
        assert_eq!(message.tags, vec!["newsletter".to_string(), "weekly".to_string()]);
    }

    #[test]
    fn test_duplicate_global_keys_fail_build() {
        let error = base()
            .to("r@example.com")
            .global_merge_data_list(json!([
                {"key": "Age", "value": "1"},
                {"key": "age", "value": "2"}
            ]))
            .build()
            .unwrap_err();

        assert!(matches!(error, SocketLabsError::DuplicateMergeKeys { .. }));
    }

    #[test]
    fn test_duplicate_recipient_keys_fail_build() {
        let error = base()
            .recipient(
                "r@example.com",
                "R",
                vec![MergeData::new("Color", "Blue"), MergeData::new("COLOR", "Red")],
            )
            .build()
            .unwrap_err();

        match error {
            SocketLabsError::DuplicateMergeKeys { keys, .. } => assert_eq!(keys, vec!["color"]),
            other => panic!("expected DuplicateMergeKeys, got {:?}", other),
        }
    }

    #[test]
    fn test_build_validates_recipients() {
        let error = base().to_list(json!(["ok@example.com", "broken"])).build().unwrap_err();
        let response = error.into_send_response().unwrap();

        assert_eq!(response.result, SendResult::RecipientValidationInvalidRecipients);
        assert_eq!(response.address_results.len(), 1);
        assert_eq!(response.address_results[0].email_address, "broken");
    }
}
