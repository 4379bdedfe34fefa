//! Pre-send validation.
//!
//! [`validate_message`] checks a message against the service's acceptance
//! rules in a fixed order and returns the first failure as a
//! [`SendResponse`]. Only the recipient scan accumulates: every invalid
//! address is reported, not just the first. Validation is read-only and
//! stateless.
//!
//! # Examples
//!
//! ```rust
//! use integrations_socketlabs::types::{BasicMessage, SendResult};
//! use integrations_socketlabs::validation::validate_message;
//!
//! # fn example() -> Result<(), integrations_socketlabs::error::SocketLabsError> {
//! let mut message = BasicMessage::new();
//! message.set_subject("Hi").set_html_body("<p>x</p>");
//! message.set_from("a@example.com")?.add_to("b@example.com")?;
//!
//! assert_eq!(validate_message(&message.into()).result, SendResult::Success);
//! # Ok(())
//! # }
//! ```

use std::fmt;

use crate::types::{
    duplicate_keys, AddressResult, BasicMessage, BulkMessage, EmailAddress, Message, MessageContent,
    SendResponse, SendResult,
};

/// Most recipients a single message may address.
pub const MAXIMUM_RECIPIENTS_PER_MESSAGE: usize = 50;

const API_KEY_LENGTH: usize = 61;
const API_KEY_PUBLIC_PART_LENGTH: usize = 20;
const API_KEY_SECRET_PART_LENGTH: usize = 40;

type Check = Result<(), SendResponse>;

fn fail(result: SendResult) -> Check {
    Err(SendResponse::new(result))
}

fn is_empty(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

/// Validate either kind of message.
pub fn validate_message(message: &Message) -> SendResponse {
    match message {
        Message::Basic(basic) => validate_basic(basic),
        Message::Bulk(bulk) => validate_bulk(bulk),
    }
}

/// Validate a basic message.
pub fn validate_basic(message: &BasicMessage) -> SendResponse {
    let outcome = validate_content(&message.content)
        .and_then(|_| validate_recipients(message.recipient_count(), message.recipients().map(address_of)));
    finish(outcome)
}

/// Validate a bulk message.
pub fn validate_bulk(message: &BulkMessage) -> SendResponse {
    let outcome = validate_content(&message.content)
        .and_then(|_| validate_metadata(message))
        .and_then(|_| {
            validate_recipients(
                message.to.len(),
                message.to.iter().map(|r| r.email_address.as_str()),
            )
        })
        .and_then(|_| validate_merge_keys(message));
    finish(outcome)
}

fn finish(outcome: Check) -> SendResponse {
    match outcome {
        Ok(()) => SendResponse::success(),
        Err(response) => {
            tracing::debug!(
                result = %response.result,
                invalid_addresses = response.address_results.len(),
                "Message failed validation"
            );
            response
        }
    }
}

fn address_of(address: &EmailAddress) -> &str {
    address.email_address.as_str()
}

fn validate_content(content: &MessageContent) -> Check {
    if is_empty(content.subject.as_deref()) {
        return fail(SendResult::MessageValidationEmptySubject);
    }

    match &content.from {
        Some(from) if !from.email_address.is_empty() => {
            if !from.is_valid() {
                return fail(SendResult::EmailAddressValidationInvalidFrom);
            }
        }
        _ => return fail(SendResult::EmailAddressValidationMissingFrom),
    }

    if let Some(reply_to) = &content.reply_to {
        if !reply_to.email_address.trim().is_empty() && !reply_to.is_valid() {
            return fail(SendResult::RecipientValidationInvalidReplyTo);
        }
    }

    let has_template = content.api_template.map_or(false, |id| id > 0);
    let has_body = !is_empty(content.html_body.as_deref()) || !is_empty(content.text_body.as_deref());
    if !has_template && !has_body {
        return fail(SendResult::MessageValidationEmptyMessage);
    }

    let attachment_headers = content.attachments.iter().flat_map(|a| &a.custom_headers);
    if !content.custom_headers.iter().chain(attachment_headers).all(|h| h.is_valid()) {
        return fail(SendResult::MessageValidationInvalidCustomHeaders);
    }

    Ok(())
}

fn validate_metadata(message: &BulkMessage) -> Check {
    if message.metadata.iter().all(|m| m.is_valid()) {
        Ok(())
    } else {
        fail(SendResult::MessageValidationInvalidMetadata)
    }
}

fn validate_recipients<'a>(count: usize, addresses: impl Iterator<Item = &'a str>) -> Check {
    if count == 0 {
        return fail(SendResult::RecipientValidationNoneInMessage);
    }
    if count > MAXIMUM_RECIPIENTS_PER_MESSAGE {
        return fail(SendResult::RecipientValidationMaxExceeded);
    }

    let invalid: Vec<AddressResult> = addresses
        .filter(|address| !crate::types::is_valid_address(address))
        .map(AddressResult::invalid)
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(SendResponse::new(SendResult::RecipientValidationInvalidRecipients).with_address_results(invalid))
    }
}

fn validate_merge_keys(message: &BulkMessage) -> Check {
    let global = duplicate_keys(message.global_merge_data.iter().map(|m| m.key.as_str()));
    if !global.is_empty() {
        return Err(SendResponse::new(SendResult::InvalidMergeData).with_message(format!(
            "Duplicate global merge data keys: {}",
            global.join(", ")
        )));
    }

    let per_recipient: Vec<AddressResult> = message
        .to
        .iter()
        .filter_map(|recipient| {
            let keys = recipient.duplicate_merge_keys();
            if keys.is_empty() {
                return None;
            }
            Some(AddressResult {
                email_address: recipient.email_address.clone(),
                accepted: false,
                error_code: Some(format!(
                    "{} ({})",
                    SendResult::InvalidMergeData.as_str(),
                    keys.join(", ")
                )),
            })
        })
        .collect();

    if per_recipient.is_empty() {
        Ok(())
    } else {
        Err(SendResponse::new(SendResult::InvalidMergeData)
            .with_message("Duplicate merge data keys found on one or more recipients")
            .with_address_results(per_recipient))
    }
}

/// Check the server ID and API key before anything is sent.
///
/// Fails with [`SendResult::AuthenticationValidationFailed`] when the key is
/// blank or the server ID is zero.
pub fn validate_credentials(server_id: u64, api_key: &str) -> SendResponse {
    if server_id == 0 || api_key.trim().is_empty() {
        return finish(fail(SendResult::AuthenticationValidationFailed));
    }
    SendResponse::success()
}

/// Outcome of parsing an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiKeyParseResult {
    /// The key is blank.
    InvalidEmptyOrWhitespace,
    /// The key is not 61 characters.
    InvalidKeyLength,
    /// The key has no `.` separator.
    InvalidKeyFormat,
    /// The part before the separator is not 20 characters.
    InvalidPublicPartLength,
    /// The part after the separator is not 40 characters.
    InvalidSecretPartLength,
    /// The key has the bearer format.
    Success,
}

impl ApiKeyParseResult {
    /// Whether the key can be sent as a bearer token.
    pub fn is_success(&self) -> bool {
        matches!(self, ApiKeyParseResult::Success)
    }
}

impl fmt::Display for ApiKeyParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApiKeyParseResult::InvalidEmptyOrWhitespace => "InvalidEmptyOrWhitespace",
            ApiKeyParseResult::InvalidKeyLength => "InvalidKeyLength",
            ApiKeyParseResult::InvalidKeyFormat => "InvalidKeyFormat",
            ApiKeyParseResult::InvalidPublicPartLength => "InvalidPublicPartLength",
            ApiKeyParseResult::InvalidSecretPartLength => "InvalidSecretPartLength",
            ApiKeyParseResult::Success => "Success",
        };
        f.write_str(name)
    }
}

/// Classify an API key.
///
/// Keys of the form `<20 chars>.<40 chars>` are bearer keys; anything else
/// is treated as a legacy key.
pub fn parse_api_key(api_key: &str) -> ApiKeyParseResult {
    if api_key.trim().is_empty() {
        return ApiKeyParseResult::InvalidEmptyOrWhitespace;
    }
    if api_key.chars().count() != API_KEY_LENGTH {
        return ApiKeyParseResult::InvalidKeyLength;
    }

    let Some((public, secret)) = api_key.split_once('.') else {
        return ApiKeyParseResult::InvalidKeyFormat;
    };

    if public.chars().count() != API_KEY_PUBLIC_PART_LENGTH {
        return ApiKeyParseResult::InvalidPublicPartLength;
    }
    if secret.chars().count() != API_KEY_SECRET_PART_LENGTH {
        return ApiKeyParseResult::InvalidSecretPartLength;
    }

    ApiKeyParseResult::Success
}
