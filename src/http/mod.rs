//! HTTP module for Injection API communication.
//!
//! - **Transport**: pluggable transport ([`Transport`]), reqwest by default
//! - **Response parsing**: total mapping of responses and transport failures
//!   onto [`crate::types::SendResponse`]
//!
//! ```text
//! ┌─────────────────┐
//! │  RetryHandler   │  - backoff between attempts
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   Transport     │  - one POST per attempt
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │   reqwest       │  - actual HTTP implementation
//! └─────────────────┘
//! ```

mod response;
mod transport;

pub use response::{parse_response, parse_transport_error, result_for_status};
pub use transport::{
    HttpRequest, RawResponse, ReqwestTransport, Transport, TransportError, TransportErrorKind,
};
