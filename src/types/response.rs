//! Send result codes and response types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! send_results {
    ($($(#[$doc:meta])* $variant:ident => $message:literal,)+) => {
        /// Result codes reported by the Injection API or produced by client-side validation.
        ///
        /// Codes prefixed with `MessageValidation`, `RecipientValidation`,
        /// `EmailAddressValidation` or `AuthenticationValidation` are raised
        /// locally before any request is made.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum SendResult {
            $($(#[$doc])* $variant,)+
        }

        impl SendResult {
            /// Every result code, in declaration order.
            pub const ALL: &'static [SendResult] = &[$(SendResult::$variant,)+];

            /// The code name used on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(SendResult::$variant => stringify!($variant),)+
                }
            }

            /// Human-readable description of the code.
            pub fn message(&self) -> &'static str {
                match self {
                    $(SendResult::$variant => $message,)+
                }
            }

            /// Look up a code by its wire name, ignoring ASCII case.
            pub fn from_code(code: &str) -> Option<Self> {
                let code = code.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|result| result.as_str().eq_ignore_ascii_case(code))
            }
        }
    };
}

send_results! {
    /// An error occurred that could not be classified.
    UnknownError => "An error has occurred that was unforeseen",
    /// The request timed out.
    Timeout => "A timeout occurred sending the message",
    /// The message was accepted.
    Success => "Successful send of message",
    /// The service reported warnings; the first message result carries the detail.
    Warning => "Warnings were found while sending the message",
    /// The service failed internally.
    InternalError => "Internal server error",
    /// The message is over the size limit.
    MessageTooLarge => "Message has exceeded the size limit",
    /// The message has more recipients than allowed.
    TooManyRecipients => "Message exceeded the maximum allowed recipient count",
    /// The request body was rejected as invalid.
    InvalidData => "The message request contained invalid data",
    /// The account is over its quota or rate limit.
    OverQuota => "The account is over the send quota, rate limit exceeded",
    /// Too many errors occurred while sending.
    TooManyErrors => "Too many errors occurred sending the message",
    /// The server ID and API key were refused.
    InvalidAuthentication => "The serverId and apiKey combination is not valid",
    /// The account is disabled.
    AccountDisabled => "The account has been disabled",
    /// The request carried too many messages.
    TooManyMessages => "Too many messages were found on the request",
    /// None of the recipients were valid.
    NoValidRecipients => "No valid recipients were found on the message",
    /// A recipient address was refused.
    InvalidAddress => "An invalid recipient address was found on the message",
    /// An attachment was refused.
    InvalidAttachment => "An invalid attachment was found on the message",
    /// The request carried no messages.
    NoMessages => "No messages were found on the request",
    /// The message had no content.
    EmptyMessage => "No message content was found on the request",
    /// The message had no subject.
    EmptySubject => "No subject was found on the message",
    /// The From address was refused.
    InvalidFrom => "An invalid From address was found on the message",
    /// The message had no To addresses.
    EmptyToAddress => "No To addresses were found on the message",
    /// The message had no usable body.
    NoValidBodyParts => "No valid message body was found on the message",
    /// The template ID is unknown.
    InvalidTemplateId => "An invalid templateId was found on the message",
    /// The template has no content.
    TemplateHasNoContent => "The specified templateId has no content associated with it",
    /// A template ID was combined with inline bodies.
    MessageBodyConflict => "A conflict occurred due to the use of templateId and HtmlBody or TextBody",
    /// Merge data was refused, or keys collide.
    InvalidMergeData => "Invalid merge data was found on the message",
    /// The server ID or API key is missing.
    AuthenticationValidationFailed => "Validation Error: Authentication validation failed, missing or invalid ServerId or ApiKey",
    /// The message addresses more than 50 recipients.
    RecipientValidationMaxExceeded => "Validation Error: Message exceeded maximum recipient count",
    /// The message has no recipients.
    RecipientValidationNoneInMessage => "Validation Error: No recipients were found in the message",
    /// The message has no From address.
    EmailAddressValidationMissingFrom => "Validation Error: Message is missing From address",
    /// The message has no To addresses.
    RecipientValidationMissingTo => "Validation Error: Message is missing To address(es)",
    /// The From address fails the syntax check.
    EmailAddressValidationInvalidFrom => "Validation Error: Message contains an invalid From address",
    /// The message has no subject.
    MessageValidationEmptySubject => "Validation Error: Message does not contain a subject",
    /// The message has neither a body nor a template.
    MessageValidationEmptyMessage => "Validation Error: Message does not contain a message body",
    /// A custom header has neither name nor value.
    MessageValidationInvalidCustomHeaders => "Validation Error: Message contains invalid custom headers",
    /// A metadata entry has neither key nor value.
    MessageValidationInvalidMetadata => "Validation Error: Message contains invalid metadata",
    /// The reply-to address fails the syntax check.
    RecipientValidationInvalidReplyTo => "Validation Error: Message contains invalid ReplyTo address",
    /// One or more recipients fail the syntax check.
    RecipientValidationInvalidRecipients => "Validation Error: Message contains invalid recipients",
    /// The service answered 502.
    BadGateway => "Bad Gateway Error",
    /// The service answered 503.
    ServiceUnavailable => "Service Unavailable",
    /// The service answered 504.
    GatewayTimeout => "Gateway Timeout",
}

impl SendResult {
    /// Returns true for [`SendResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, SendResult::Success)
    }
}

impl fmt::Display for SendResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SendResult {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or(())
    }
}

/// Per-recipient acceptance outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddressResult {
    /// The recipient address.
    #[serde(alias = "emailAddress", default)]
    pub email_address: String,

    /// Whether the address was accepted for delivery.
    #[serde(alias = "accepted", default)]
    pub accepted: bool,

    /// Reason the address was refused, if any.
    #[serde(alias = "errorCode", default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl AddressResult {
    /// An address refused by client-side validation.
    pub fn invalid(email_address: impl Into<String>) -> Self {
        Self {
            email_address: email_address.into(),
            accepted: false,
            error_code: Some(SendResult::InvalidAddress.as_str().to_string()),
        }
    }
}

impl fmt::Display for AddressResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.error_code.as_deref().unwrap_or("Accepted"),
            self.email_address
        )
    }
}

/// The typed outcome of a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    /// The result code.
    pub result: SendResult,

    /// Human-readable detail, defaulting to the result code's message.
    pub response_message: String,

    /// HTTP status of the final attempt, when a response was received.
    pub status: Option<u16>,

    /// Receipt issued by the service for accepted requests.
    pub transaction_receipt: Option<String>,

    /// Per-address outcomes for address failures.
    pub address_results: Vec<AddressResult>,
}

impl SendResponse {
    /// Create a response for the given code.
    pub fn new(result: SendResult) -> Self {
        Self {
            result,
            response_message: result.message().to_string(),
            status: None,
            transaction_receipt: None,
            address_results: Vec::new(),
        }
    }

    /// A successful response.
    pub fn success() -> Self {
        Self::new(SendResult::Success)
    }

    /// Override the response message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.response_message = message.into();
        self
    }

    /// Attach the HTTP status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach per-address outcomes.
    pub fn with_address_results(mut self, address_results: Vec<AddressResult>) -> Self {
        self.address_results = address_results;
        self
    }

    /// Returns true if the result code is [`SendResult::Success`].
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

impl Default for SendResponse {
    fn default() -> Self {
        Self::new(SendResult::UnknownError)
    }
}

impl fmt::Display for SendResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.result, self.response_message)?;
        if !self.address_results.is_empty() {
            let addresses: Vec<String> = self
                .address_results
                .iter()
                .map(ToString::to_string)
                .collect();
            write!(f, " [{}]", addresses.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_ignores_case() {
        assert_eq!(SendResult::from_code("Success"), Some(SendResult::Success));
        assert_eq!(SendResult::from_code("overquota"), Some(SendResult::OverQuota));
        assert_eq!(SendResult::from_code(" InvalidAddress "), Some(SendResult::InvalidAddress));
        assert_eq!(SendResult::from_code("NotACode"), None);
        assert_eq!("Timeout".parse::<SendResult>(), Ok(SendResult::Timeout));
    }

    #[test]
    fn test_every_code_round_trips_by_name() {
        for result in SendResult::ALL {
            assert_eq!(SendResult::from_code(result.as_str()), Some(*result));
            assert!(!result.message().is_empty());
        }
    }

    #[test]
    fn test_response_defaults_message_from_table() {
        let response = SendResponse::new(SendResult::MessageValidationEmptySubject);
        assert_eq!(
            response.response_message,
            "Validation Error: Message does not contain a subject"
        );
        assert!(!response.is_success());
        assert!(SendResponse::success().is_success());
    }

    #[test]
    fn test_response_display_lists_addresses() {
        let response = SendResponse::new(SendResult::RecipientValidationInvalidRecipients)
            .with_address_results(vec![AddressResult::invalid("a@b@c")]);
        assert_eq!(
            response.to_string(),
            "RecipientValidationInvalidRecipients: Validation Error: Message contains invalid recipients [InvalidAddress: a@b@c]"
        );
    }

    #[test]
    fn test_address_result_accepts_both_casings() {
        let pascal: AddressResult = serde_json::from_str(
            r#"{"EmailAddress":"a@example.com","Accepted":false,"ErrorCode":"InvalidAddress"}"#,
        )
        .unwrap();
        let camel: AddressResult = serde_json::from_str(
            r#"{"emailAddress":"a@example.com","accepted":false,"errorCode":"InvalidAddress"}"#,
        )
        .unwrap();
        assert_eq!(pascal, camel);
        assert_eq!(pascal, AddressResult::invalid("a@example.com"));
    }
}
