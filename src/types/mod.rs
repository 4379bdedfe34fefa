//! Canonical message model.
//!
//! - [`EmailAddress`] and [`BulkRecipient`] for senders and recipients
//! - [`MergeData`], [`Metadata`] and [`CustomHeader`] key/value pairs
//! - [`Attachment`] for attached files
//! - [`BasicMessage`], [`BulkMessage`] and the [`Message`] sum of the two
//! - [`SendResult`], [`SendResponse`] and [`AddressResult`] for send outcomes

mod address;
mod attachment;
mod fields;
mod message;
mod response;

pub use address::{is_valid_address, BulkRecipient, EmailAddress, MAX_ADDRESS_LENGTH};
pub use attachment::{Attachment, AttachmentSource};
pub use fields::{CustomHeader, MergeData, Metadata};
pub use message::{BasicMessage, BulkMessage, Message, MessageContent, MessageType};
pub use response::{AddressResult, SendResponse, SendResult};

pub(crate) use fields::duplicate_keys;
