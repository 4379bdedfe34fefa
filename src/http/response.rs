//! Response parsing.
//!
//! Every outcome of an attempt maps to exactly one [`SendResponse`]:
//! 2xx bodies by their reported error code, other statuses by a fixed table,
//! and transport failures by their kind.

use serde::Deserialize;

use super::transport::{RawResponse, TransportError, TransportErrorKind};
use crate::types::{AddressResult, SendResponse, SendResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InjectionResponseBody {
    #[serde(alias = "errorCode", default)]
    error_code: Option<String>,

    #[serde(alias = "transactionReceipt", default)]
    transaction_receipt: Option<String>,

    #[serde(alias = "messageResults", default)]
    message_results: Option<Vec<MessageResultBody>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MessageResultBody {
    #[serde(alias = "errorCode", default)]
    error_code: Option<String>,

    #[serde(alias = "addressResults", default)]
    address_results: Option<Vec<AddressResult>>,
}

fn result_for_code(code: Option<&str>) -> SendResult {
    code.and_then(SendResult::from_code)
        .unwrap_or(SendResult::UnknownError)
}

/// Result code for a non-2xx status.
pub fn result_for_status(status: u16) -> SendResult {
    match status {
        400 => SendResult::InvalidData,
        401 | 403 => SendResult::InvalidAuthentication,
        408 => SendResult::Timeout,
        413 => SendResult::MessageTooLarge,
        429 => SendResult::OverQuota,
        500 => SendResult::InternalError,
        502 => SendResult::BadGateway,
        503 => SendResult::ServiceUnavailable,
        504 => SendResult::GatewayTimeout,
        _ => SendResult::UnknownError,
    }
}

/// Map an HTTP response to a send result.
pub fn parse_response(response: &RawResponse) -> SendResponse {
    if !response.is_success() {
        return SendResponse::new(result_for_status(response.status)).with_status(response.status);
    }

    let body: InjectionResponseBody = match serde_json::from_slice(&response.body) {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(status = response.status, error = %e, "Unparseable injection response");
            return SendResponse::new(SendResult::UnknownError)
                .with_message(format!("Unable to parse response: {}", e))
                .with_status(response.status);
        }
    };

    let mut result = result_for_code(body.error_code.as_deref());
    let first_message = body.message_results.and_then(|results| results.into_iter().next());

    let mut address_results = Vec::new();
    if let Some(message) = first_message {
        if result == SendResult::Warning {
            result = result_for_code(message.error_code.as_deref());
        }
        address_results = message.address_results.unwrap_or_default();
    }

    let mut parsed = SendResponse::new(result)
        .with_status(response.status)
        .with_address_results(address_results);
    parsed.transaction_receipt = body.transaction_receipt.filter(|r| !r.is_empty());
    parsed
}

/// Map a transport failure to a send result.
pub fn parse_transport_error(error: &TransportError) -> SendResponse {
    match error.kind {
        TransportErrorKind::Timeout => SendResponse::new(SendResult::Timeout),
        TransportErrorKind::Connect | TransportErrorKind::Other => {
            SendResponse::new(SendResult::UnknownError).with_message(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_body() {
        let response = RawResponse::new(
            200,
            r#"{"ErrorCode":"Success","TransactionReceipt":"abc-123","MessageResults":[]}"#,
        );
        let parsed = parse_response(&response);

        assert!(parsed.is_success());
        assert_eq!(parsed.status, Some(200));
        assert_eq!(parsed.transaction_receipt.as_deref(), Some("abc-123"));
        assert!(parsed.address_results.is_empty());
    }

    #[test]
    fn test_camel_case_body() {
        let response = RawResponse::new(200, r#"{"errorCode":"OverQuota","transactionReceipt":null}"#);
        let parsed = parse_response(&response);
        assert_eq!(parsed.result, SendResult::OverQuota);
        assert_eq!(parsed.transaction_receipt, None);
    }

    #[test]
    fn test_warning_uses_first_message_result() {
        let response = RawResponse::new(
            200,
            r#"{
                "ErrorCode": "Warning",
                "MessageResults": [{
                    "Index": 0,
                    "ErrorCode": "InvalidAddress",
                    "AddressResults": [
                        {"EmailAddress": "bad@example", "Accepted": false, "ErrorCode": "InvalidAddress"},
                        {"EmailAddress": "ok@example.com", "Accepted": true, "ErrorCode": null}
                    ]
                }]
            }"#,
        );
        let parsed = parse_response(&response);

        assert_eq!(parsed.result, SendResult::InvalidAddress);
        assert_eq!(parsed.address_results.len(), 2);
        assert_eq!(parsed.address_results[0], AddressResult::invalid("bad@example"));
        assert!(parsed.address_results[1].accepted);
    }

    #[test]
    fn test_unknown_code_and_unparseable_body() {
        let parsed = parse_response(&RawResponse::new(200, r#"{"ErrorCode":"SomethingNew"}"#));
        assert_eq!(parsed.result, SendResult::UnknownError);

        let parsed = parse_response(&RawResponse::new(200, "<html>oops</html>"));
        assert_eq!(parsed.result, SendResult::UnknownError);
        assert!(parsed.response_message.starts_with("Unable to parse response"));
    }

    #[test]
    fn test_status_table() {
        for (status, expected) in [
            (400, SendResult::InvalidData),
            (401, SendResult::InvalidAuthentication),
            (403, SendResult::InvalidAuthentication),
            (408, SendResult::Timeout),
            (413, SendResult::MessageTooLarge),
            (429, SendResult::OverQuota),
            (500, SendResult::InternalError),
            (502, SendResult::BadGateway),
            (503, SendResult::ServiceUnavailable),
            (504, SendResult::GatewayTimeout),
            (418, SendResult::UnknownError),
            (301, SendResult::UnknownError),
        ] {
            let parsed = parse_response(&RawResponse::new(status, "irrelevant"));
            assert_eq!(parsed.result, expected, "status {}", status);
            assert_eq!(parsed.status, Some(status));
        }
    }

    #[test]
    fn test_transport_errors() {
        assert_eq!(
            parse_transport_error(&TransportError::timeout("deadline")).result,
            SendResult::Timeout
        );

        let parsed = parse_transport_error(&TransportError::connect("connection refused"));
        assert_eq!(parsed.result, SendResult::UnknownError);
        assert_eq!(parsed.response_message, "connection refused");
    }
}
