//! Injection API request shapes.
//!
//! Fields that are absent or empty are left out of the JSON entirely; the
//! service treats a missing field differently from an empty one.
//!
//! Bulk messages are restructured for the service's merge convention: the
//! `to` list collapses to one placeholder recipient
//! (`%%DeliveryAddress%%` / `%%RecipientName%%`) and the real recipients move
//! into `mergeData.PerMessage`, one list of `{field, value}` pairs each.

use serde::Serialize;
use serde_json::Value;

use crate::error::SocketLabsResult;
use crate::normalize::{check_global_keys, check_recipient_keys};
use crate::types::{
    Attachment, BasicMessage, BulkMessage, BulkRecipient, CustomHeader, EmailAddress, MergeData,
    Message, MessageContent, Metadata,
};

/// Placeholder address substituted per recipient in bulk sends.
pub const DELIVERY_ADDRESS_PLACEHOLDER: &str = "%%DeliveryAddress%%";
/// Placeholder name substituted per recipient in bulk sends.
pub const RECIPIENT_NAME_PLACEHOLDER: &str = "%%RecipientName%%";

const DELIVERY_ADDRESS_FIELD: &str = "DeliveryAddress";
const RECIPIENT_NAME_FIELD: &str = "RecipientName";

fn present(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

/// Request envelope posted to the injection endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionRequest {
    /// Legacy API key. Empty when the key travels as a bearer token.
    pub api_key: String,
    /// Server the messages are injected into.
    pub server_id: u64,
    /// Messages in the request. The client always sends exactly one.
    pub messages: Vec<MessageJson>,
}

impl InjectionRequest {
    /// Build a request carrying one message.
    pub fn new(server_id: u64, api_key: impl Into<String>, message: &Message) -> SocketLabsResult<Self> {
        Ok(Self {
            api_key: api_key.into(),
            server_id,
            messages: vec![MessageJson::from_message(message)?],
        })
    }

    /// Serialize to the JSON request body.
    pub fn to_body(&self) -> SocketLabsResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Serialize a message to its wire JSON.
///
/// # Errors
///
/// Fails with [`crate::error::SocketLabsError::DuplicateMergeKeys`] when a
/// bulk message carries colliding merge keys.
pub fn to_wire_format(message: &Message) -> SocketLabsResult<Value> {
    Ok(serde_json::to_value(MessageJson::from_message(message)?)?)
}

/// An address on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressJson {
    pub(crate) email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) friendly_name: Option<String>,
}

impl From<&EmailAddress> for AddressJson {
    fn from(address: &EmailAddress) -> Self {
        Self {
            email_address: address.email_address.clone(),
            friendly_name: present(&address.friendly_name),
        }
    }
}

/// A custom header on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomHeaderJson {
    pub(crate) name: String,
    pub(crate) value: String,
}

impl From<&CustomHeader> for CustomHeaderJson {
    fn from(header: &CustomHeader) -> Self {
        Self {
            name: header.name.clone(),
            value: header.value.clone(),
        }
    }
}

/// A metadata pair on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataJson {
    pub(crate) key: String,
    pub(crate) value: String,
}

impl From<&Metadata> for MetadataJson {
    fn from(metadata: &Metadata) -> Self {
        Self {
            key: metadata.key.clone(),
            value: metadata.value.clone(),
        }
    }
}

/// A merge field on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeFieldJson {
    pub(crate) field: String,
    pub(crate) value: String,
}

impl MergeFieldJson {
    fn new(field: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

impl From<&MergeData> for MergeFieldJson {
    fn from(merge_data: &MergeData) -> Self {
        Self::new(&merge_data.key, &merge_data.value)
    }
}

/// Merge data block of a bulk message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeDataJson {
    #[serde(rename = "PerMessage", skip_serializing_if = "Vec::is_empty")]
    pub(crate) per_message: Vec<Vec<MergeFieldJson>>,
    #[serde(rename = "Global", skip_serializing_if = "Vec::is_empty")]
    pub(crate) global: Vec<MergeFieldJson>,
}

/// An attachment on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentJson {
    pub(crate) name: String,
    pub(crate) content: String,
    pub(crate) content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) content_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) custom_headers: Vec<CustomHeaderJson>,
}

impl From<&Attachment> for AttachmentJson {
    fn from(attachment: &Attachment) -> Self {
        Self {
            name: attachment.name.clone(),
            content: attachment.content.clone(),
            content_type: attachment.content_type.clone(),
            content_id: present(&attachment.content_id),
            custom_headers: attachment.custom_headers.iter().map(Into::into).collect(),
        }
    }
}

/// One message on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageJson {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) html_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) text_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) amp_body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) api_template: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) mailing_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) char_set: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) from: Option<AddressJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) reply_to: Option<AddressJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) custom_headers: Vec<CustomHeaderJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) attachments: Vec<AttachmentJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) to: Vec<AddressJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) cc: Vec<AddressJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) bcc: Vec<AddressJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) merge_data: Option<MergeDataJson>,
    #[serde(rename = "meta", skip_serializing_if = "Vec::is_empty")]
    pub(crate) metadata: Vec<MetadataJson>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) tags: Vec<String>,
}

impl MessageJson {
    /// Convert either kind of message.
    pub fn from_message(message: &Message) -> SocketLabsResult<Self> {
        match message {
            Message::Basic(basic) => Ok(Self::from_basic(basic)),
            Message::Bulk(bulk) => Self::from_bulk(bulk),
        }
    }

    fn from_content(content: &MessageContent) -> Self {
        Self {
            subject: present(&content.subject),
            html_body: present(&content.html_body),
            text_body: present(&content.text_body),
            amp_body: present(&content.amp_body),
            api_template: content.api_template.filter(|id| *id > 0),
            mailing_id: present(&content.mailing_id),
            message_id: present(&content.message_id),
            char_set: present(&content.char_set),
            from: content.from.as_ref().map(Into::into),
            reply_to: content
                .reply_to
                .as_ref()
                .filter(|reply_to| !reply_to.is_blank())
                .map(Into::into),
            custom_headers: content.custom_headers.iter().map(Into::into).collect(),
            attachments: content.attachments.iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Convert a basic message.
    pub fn from_basic(message: &BasicMessage) -> Self {
        Self {
            to: message.to.iter().map(Into::into).collect(),
            cc: message.cc.iter().map(Into::into).collect(),
            bcc: message.bcc.iter().map(Into::into).collect(),
            ..Self::from_content(&message.content)
        }
    }

    /// Convert a bulk message, moving recipients into per-message merge data.
    pub fn from_bulk(message: &BulkMessage) -> SocketLabsResult<Self> {
        check_global_keys(&message.global_merge_data)?;
        for recipient in &message.to {
            check_recipient_keys(recipient)?;
        }

        let mut json = Self::from_content(&message.content);
        let mut merge_data = MergeDataJson::default();

        if !message.to.is_empty() {
            json.to = vec![AddressJson {
                email_address: DELIVERY_ADDRESS_PLACEHOLDER.to_string(),
                friendly_name: Some(RECIPIENT_NAME_PLACEHOLDER.to_string()),
            }];
            merge_data.per_message = message.to.iter().map(per_message_fields).collect();
        }
        merge_data.global = message.global_merge_data.iter().map(Into::into).collect();

        if !merge_data.per_message.is_empty() || !merge_data.global.is_empty() {
            json.merge_data = Some(merge_data);
        }
        json.metadata = message.metadata.iter().map(Into::into).collect();
        json.tags = message.tags.clone();

        Ok(json)
    }
}

fn per_message_fields(recipient: &BulkRecipient) -> Vec<MergeFieldJson> {
    let mut fields = vec![MergeFieldJson::new(DELIVERY_ADDRESS_FIELD, &recipient.email_address)];
    if let Some(name) = recipient.friendly_name.as_deref().filter(|n| !n.is_empty()) {
        fields.push(MergeFieldJson::new(RECIPIENT_NAME_FIELD, name));
    }
    fields.extend(recipient.merge_data.iter().map(MergeFieldJson::from));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SocketLabsError;
    use crate::normalize::normalize;
    use serde_json::json;

    fn basic() -> BasicMessage {
        let mut message = BasicMessage::new();
        message.set_subject("Hi").set_html_body("<p>x</p>");
        message.set_from("a@example.com").unwrap();
        message.add_to("b@example.com").unwrap();
        message
    }

    #[test]
    fn test_basic_message_sparse_json() {
        let json = to_wire_format(&basic().into()).unwrap();
        assert_eq!(
            json,
            json!({
                "subject": "Hi",
                "htmlBody": "<p>x</p>",
                "from": {"emailAddress": "a@example.com"},
                "to": [{"emailAddress": "b@example.com"}]
            })
        );
    }

    #[test]
    fn test_basic_message_full_json() {
        let mut message = basic();
        message
            .set_text_body("x")
            .set_amp_body("<amp/>")
            .set_api_template(7)
            .set_char_set("UTF-8")
            .set_message_id("m-1")
            .set_mailing_id("ml-1");
        message
            .set_reply_to(EmailAddress::with_name("r@example.com", "Reply"))
            .unwrap()
            .add_cc("c@example.com")
            .unwrap()
            .add_bcc("d@example.com")
            .unwrap()
            .add_custom_header(("X-Test", "1"))
            .unwrap()
            .add_attachment(Attachment::new("a.txt", "text/plain", b"hello").content_id("a"))
            .unwrap();

        let json = to_wire_format(&message.into()).unwrap();
        assert_eq!(json["textBody"], "x");
        assert_eq!(json["ampBody"], "<amp/>");
        assert_eq!(json["apiTemplate"], 7);
        assert_eq!(json["charSet"], "UTF-8");
        assert_eq!(json["messageId"], "m-1");
        assert_eq!(json["mailingId"], "ml-1");
        assert_eq!(json["replyTo"], json!({"emailAddress": "r@example.com", "friendlyName": "Reply"}));
        assert_eq!(json["cc"], json!([{"emailAddress": "c@example.com"}]));
        assert_eq!(json["bcc"], json!([{"emailAddress": "d@example.com"}]));
        assert_eq!(json["customHeaders"], json!([{"name": "X-Test", "value": "1"}]));
        assert_eq!(
            json["attachments"],
            json!([{"name": "a.txt", "content": "aGVsbG8=", "contentType": "text/plain", "contentId": "a"}])
        );
        assert!(json.get("mergeData").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn test_bulk_message_restructures_recipients() {
        let mut message = BulkMessage::new();
        message.set_subject("Hi %%Name%%").set_html_body("<p>%%Motto%%</p>");
        message.set_from("a@example.com").unwrap();
        message
            .add_to_recipient("r1@example.com", "Recipient One", vec![MergeData::new("Motto", "Be bold")])
            .unwrap()
            .add_to("r2@example.com")
            .unwrap()
            .add_global_merge_data(("Sender", "Acme"))
            .unwrap()
            .add_metadata(("campaign", "spring"))
            .unwrap()
            .add_tag("newsletter");

        let json = to_wire_format(&message.into()).unwrap();
        assert_eq!(
            json["to"],
            json!([{"emailAddress": "%%DeliveryAddress%%", "friendlyName": "%%RecipientName%%"}])
        );
        assert_eq!(
            json["mergeData"],
            json!({
                "PerMessage": [
                    [
                        {"field": "DeliveryAddress", "value": "r1@example.com"},
                        {"field": "RecipientName", "value": "Recipient One"},
                        {"field": "Motto", "value": "Be bold"}
                    ],
                    [
                        {"field": "DeliveryAddress", "value": "r2@example.com"}
                    ]
                ],
                "Global": [{"field": "Sender", "value": "Acme"}]
            })
        );
        assert_eq!(json["meta"], json!([{"key": "campaign", "value": "spring"}]));
        assert_eq!(json["tags"], json!(["newsletter"]));
        assert!(json.get("cc").is_none());
    }

    #[test]
    fn test_bulk_duplicate_global_keys_fail() {
        let mut message = BulkMessage::new();
        message.global_merge_data = vec![MergeData::new("Age", "1"), MergeData::new("age", "2")];

        let error = to_wire_format(&message.into()).unwrap_err();
        assert!(matches!(error, SocketLabsError::DuplicateMergeKeys { .. }));
    }

    #[test]
    fn test_bulk_duplicate_recipient_keys_fail() {
        let mut message = BulkMessage::new();
        message.to = vec![BulkRecipient::new("r@example.com")
            .with_merge_data(vec![MergeData::new("K", "1"), MergeData::new("k", "2")])];

        assert!(to_wire_format(&message.into()).is_err());
    }

    #[test]
    fn test_address_shape_normalizes_back() {
        let original = EmailAddress::with_name("a@example.com", "A");
        let shape = serde_json::to_value(AddressJson::from(&original)).unwrap();
        let restored: EmailAddress = normalize(shape).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_injection_request_envelope() {
        let request = InjectionRequest::new(12345, "legacy-key", &basic().into()).unwrap();
        let body: Value = serde_json::from_slice(&request.to_body().unwrap()).unwrap();

        assert_eq!(body["apiKey"], "legacy-key");
        assert_eq!(body["serverId"], 12345);
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["messages"][0]["subject"], "Hi");
    }
}
