//! Flexible-input normalization.
//!
//! Every message setter accepts the same family of caller shapes and funnels
//! them through [`normalize`]:
//!
//! - an already-typed entity (re-checked where the entity carries invariants)
//! - a bare string, read as the entity's primary field
//! - a JSON object, whose recognized fields are copied and the rest ignored
//!
//! Anything else (numbers, booleans, arrays, `null` in a single-value slot) is
//! refused with [`SocketLabsError::InvalidInputFormat`].
//!
//! # Examples
//!
//! ```rust
//! use integrations_socketlabs::normalize::{normalize, normalize_list};
//! use integrations_socketlabs::types::EmailAddress;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), integrations_socketlabs::error::SocketLabsError> {
//! let a: EmailAddress = normalize("a@example.com")?;
//! let b: EmailAddress = normalize(json!({"emailAddress": "b@example.com", "friendlyName": "B"}))?;
//! let list: Vec<EmailAddress> = normalize_list(json!(["c@example.com", {"emailAddress": "d@example.com"}]))?;
//!
//! assert_eq!(a.email_address, "a@example.com");
//! assert_eq!(b.friendly_name.as_deref(), Some("B"));
//! assert_eq!(list.len(), 2);
//! # Ok(())
//! # }
//! ```

use serde_json::{Map, Value};

use crate::error::{SocketLabsError, SocketLabsResult};
use crate::types::{
    duplicate_keys, Attachment, BulkRecipient, CustomHeader, EmailAddress, MergeData, Metadata,
};

/// A caller-supplied value that has not been normalized yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Loose<T> {
    /// An already-typed entity.
    Typed(T),
    /// A bare string.
    Text(String),
    /// A plain key/value structure.
    Fields(Map<String, Value>),
    /// Any other shape. Always rejected.
    Unsupported(Value),
}

impl<T> From<&str> for Loose<T> {
    fn from(value: &str) -> Self {
        Loose::Text(value.to_string())
    }
}

impl<T> From<String> for Loose<T> {
    fn from(value: String) -> Self {
        Loose::Text(value)
    }
}

impl<T> From<&String> for Loose<T> {
    fn from(value: &String) -> Self {
        Loose::Text(value.clone())
    }
}

impl<T> From<Map<String, Value>> for Loose<T> {
    fn from(value: Map<String, Value>) -> Self {
        Loose::Fields(value)
    }
}

impl<T> From<Value> for Loose<T> {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Loose::Text(text),
            Value::Object(fields) => Loose::Fields(fields),
            other => Loose::Unsupported(other),
        }
    }
}

macro_rules! typed_loose {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl From<$entity> for Loose<$entity> {
                fn from(value: $entity) -> Self {
                    Loose::Typed(value)
                }
            }

            impl From<&$entity> for Loose<$entity> {
                fn from(value: &$entity) -> Self {
                    Loose::Typed(value.clone())
                }
            }
        )+
    };
}

typed_loose!(EmailAddress, BulkRecipient, MergeData, Metadata, CustomHeader, Attachment);

macro_rules! pair_loose {
    ($($entity:ident),+ $(,)?) => {
        $(
            impl<K: Into<String>, V: Into<String>> From<(K, V)> for Loose<$entity> {
                fn from((first, second): (K, V)) -> Self {
                    Loose::Typed($entity::new(first, second))
                }
            }
        )+
    };
}

pair_loose!(MergeData, Metadata, CustomHeader);

/// An entity that can be built from loosely-typed input.
pub trait Normalize: Sized {
    /// Human-readable entity name used in error messages.
    const KIND: &'static str;

    /// Build from a bare string.
    fn from_text(text: String) -> SocketLabsResult<Self> {
        let _ = text;
        Err(SocketLabsError::invalid_input(
            Self::KIND,
            "expected an object, found a string",
        ))
    }

    /// Build from a key/value structure.
    fn from_fields(fields: &Map<String, Value>) -> SocketLabsResult<Self>;

    /// Re-check an already-typed value.
    fn revalidate(self) -> SocketLabsResult<Self> {
        Ok(self)
    }
}

/// Normalize a single value into an entity.
pub fn normalize<T: Normalize>(value: impl Into<Loose<T>>) -> SocketLabsResult<T> {
    match value.into() {
        Loose::Typed(entity) => entity.revalidate(),
        Loose::Text(text) => T::from_text(text),
        Loose::Fields(fields) => T::from_fields(&fields),
        Loose::Unsupported(other) => Err(SocketLabsError::invalid_input(
            T::KIND,
            format!("expected a string or an object, found {}", describe(&other)),
        )),
    }
}

/// Normalize a JSON value that may hold one entity or an array of them.
///
/// Arrays are normalized element-wise with order preserved, `null` yields an
/// empty list, and any other value is treated as a single element.
pub fn normalize_list<T: Normalize>(value: Value) -> SocketLabsResult<Vec<T>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.into_iter().map(normalize::<T>).collect(),
        single => Ok(vec![normalize(single)?]),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read a textual field. Missing or `null` is `None`; numbers and booleans are
/// rendered as text.
fn text_field(
    fields: &Map<String, Value>,
    names: &[&str],
    kind: &'static str,
) -> SocketLabsResult<Option<String>> {
    let Some((name, value)) = names
        .iter()
        .find_map(|name| fields.get(*name).map(|value| (*name, value)))
    else {
        return Ok(None);
    };

    match value {
        Value::Null => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(flag) => Ok(Some(flag.to_string())),
        other => Err(SocketLabsError::invalid_input(
            kind,
            format!("field `{}` must be a string, found {}", name, describe(other)),
        )),
    }
}

fn list_field<T: Normalize>(fields: &Map<String, Value>, name: &str) -> SocketLabsResult<Vec<T>> {
    match fields.get(name) {
        Some(value) => normalize_list(value.clone()),
        None => Ok(Vec::new()),
    }
}

/// Fail when a recipient's merge data keys collide case-insensitively.
pub(crate) fn check_recipient_keys(recipient: &BulkRecipient) -> SocketLabsResult<()> {
    let keys = recipient.duplicate_merge_keys();
    if keys.is_empty() {
        Ok(())
    } else {
        Err(SocketLabsError::DuplicateMergeKeys {
            scope: format!("merge data for {}", recipient.email_address),
            keys,
        })
    }
}

/// Fail when merge data keys collide case-insensitively.
pub(crate) fn check_global_keys(merge_data: &[MergeData]) -> SocketLabsResult<()> {
    let keys = duplicate_keys(merge_data.iter().map(|m| m.key.as_str()));
    if keys.is_empty() {
        Ok(())
    } else {
        Err(SocketLabsError::DuplicateMergeKeys {
            scope: "global merge data".to_string(),
            keys,
        })
    }
}

impl Normalize for EmailAddress {
    const KIND: &'static str = "email address";

    fn from_text(text: String) -> SocketLabsResult<Self> {
        Ok(EmailAddress::new(text))
    }

    fn from_fields(fields: &Map<String, Value>) -> SocketLabsResult<Self> {
        Ok(EmailAddress::with_optional_name(
            text_field(fields, &["emailAddress"], Self::KIND)?.unwrap_or_default(),
            text_field(fields, &["friendlyName"], Self::KIND)?,
        ))
    }
}

impl Normalize for BulkRecipient {
    const KIND: &'static str = "bulk recipient";

    fn from_text(text: String) -> SocketLabsResult<Self> {
        Ok(BulkRecipient::new(text))
    }

    fn from_fields(fields: &Map<String, Value>) -> SocketLabsResult<Self> {
        let address = EmailAddress::from_fields(fields)?;
        let recipient = BulkRecipient::from(address).with_merge_data(list_field(fields, "mergeData")?);
        check_recipient_keys(&recipient)?;
        Ok(recipient)
    }

    fn revalidate(self) -> SocketLabsResult<Self> {
        check_recipient_keys(&self)?;
        Ok(self)
    }
}

impl Normalize for MergeData {
    const KIND: &'static str = "merge data";

    fn from_fields(fields: &Map<String, Value>) -> SocketLabsResult<Self> {
        Ok(MergeData::new(
            text_field(fields, &["key", "field"], Self::KIND)?.unwrap_or_default(),
            text_field(fields, &["value"], Self::KIND)?.unwrap_or_default(),
        ))
    }
}

impl Normalize for Metadata {
    const KIND: &'static str = "metadata";

    fn from_fields(fields: &Map<String, Value>) -> SocketLabsResult<Self> {
        Ok(Metadata::new(
            text_field(fields, &["key"], Self::KIND)?.unwrap_or_default(),
            text_field(fields, &["value"], Self::KIND)?.unwrap_or_default(),
        ))
    }
}

impl Normalize for CustomHeader {
    const KIND: &'static str = "custom header";

    fn from_fields(fields: &Map<String, Value>) -> SocketLabsResult<Self> {
        Ok(CustomHeader::new(
            text_field(fields, &["name"], Self::KIND)?.unwrap_or_default(),
            text_field(fields, &["value"], Self::KIND)?.unwrap_or_default(),
        ))
    }
}

impl Normalize for Attachment {
    const KIND: &'static str = "attachment";

    /// A bare string is a file path.
    fn from_text(text: String) -> SocketLabsResult<Self> {
        Attachment::from_path(text)
    }

    fn from_fields(fields: &Map<String, Value>) -> SocketLabsResult<Self> {
        let name = text_field(fields, &["name"], Self::KIND)?.filter(|n| !n.is_empty());
        let content_type = text_field(fields, &["contentType"], Self::KIND)?.filter(|c| !c.is_empty());
        let content = text_field(fields, &["content"], Self::KIND)?.filter(|c| !c.is_empty());
        let file_path = text_field(fields, &["filePath"], Self::KIND)?.filter(|p| !p.is_empty());

        let mut attachment = match (content, file_path) {
            (Some(content), None) => {
                let name = name.clone().ok_or_else(|| SocketLabsError::Attachment {
                    message: "inline content requires a name".to_string(),
                    source: None,
                })?;
                let content_type = content_type.clone().unwrap_or_else(|| {
                    mime_guess::from_path(&name)
                        .first_or_octet_stream()
                        .to_string()
                });
                Attachment::from_base64(name, content_type, content)
            }
            (None, Some(path)) => Attachment::from_path(path)?,
            (Some(_), Some(_)) => {
                return Err(SocketLabsError::Attachment {
                    message: "both content and filePath were supplied".to_string(),
                    source: None,
                })
            }
            (None, None) => {
                return Err(SocketLabsError::Attachment {
                    message: "either content or filePath is required".to_string(),
                    source: None,
                })
            }
        };

        if let Some(name) = name {
            attachment = attachment.name(name);
        }
        if let Some(content_type) = content_type {
            attachment = attachment.content_type(content_type);
        }
        if let Some(content_id) = text_field(fields, &["contentId"], Self::KIND)? {
            attachment = attachment.content_id(content_id);
        }
        attachment.custom_headers = list_field(fields, "customHeaders")?;

        Ok(attachment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email_address_shapes() {
        let typed: EmailAddress = normalize(EmailAddress::with_name("a@example.com", "A")).unwrap();
        let text: EmailAddress = normalize("a@example.com").unwrap();
        let fields: EmailAddress =
            normalize(json!({"emailAddress": "a@example.com", "friendlyName": "A", "extra": 1})).unwrap();

        assert_eq!(typed, fields);
        assert_eq!(text, EmailAddress::new("a@example.com"));
    }

    #[test]
    fn test_unsupported_shapes_rejected() {
        for value in [json!(42), json!(true), json!(null), json!(["a@example.com"])] {
            let result: SocketLabsResult<EmailAddress> = normalize(value);
            assert!(matches!(
                result,
                Err(SocketLabsError::InvalidInputFormat { kind: "email address", .. })
            ));
        }
    }

    #[test]
    fn test_wrong_field_type_rejected() {
        let result: SocketLabsResult<EmailAddress> = normalize(json!({"emailAddress": {"nested": true}}));
        let error = result.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid email address: field `emailAddress` must be a string, found an object"
        );
    }

    #[test]
    fn test_normalize_list_preserves_order() {
        let list: Vec<EmailAddress> = normalize_list(json!([
            "first@example.com",
            {"emailAddress": "second@example.com"},
            "third@example.com"
        ]))
        .unwrap();

        let addresses: Vec<&str> = list.iter().map(|a| a.email_address.as_str()).collect();
        assert_eq!(addresses, ["first@example.com", "second@example.com", "third@example.com"]);

        let single: Vec<EmailAddress> = normalize_list(json!("only@example.com")).unwrap();
        assert_eq!(single.len(), 1);
        assert!(normalize_list::<EmailAddress>(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_list_fails_on_any_bad_element() {
        let result: SocketLabsResult<Vec<EmailAddress>> = normalize_list(json!(["a@example.com", 7]));
        assert!(result.is_err());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once: EmailAddress = normalize(json!({"emailAddress": "a@example.com", "friendlyName": "A"})).unwrap();
        let twice: EmailAddress = normalize(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_data_pairs_and_numbers() {
        let pair: MergeData = normalize(("Motto", "Be yourself")).unwrap();
        assert_eq!(pair, MergeData::new("Motto", "Be yourself"));

        let numeric: MergeData = normalize(json!({"key": "Age", "value": 35})).unwrap();
        assert_eq!(numeric.value, "35");

        let aliased: MergeData = normalize(json!({"field": "Age", "value": "35"})).unwrap();
        assert_eq!(aliased.key, "Age");

        assert!(normalize::<MergeData>("Age").is_err());
    }

    #[test]
    fn test_bulk_recipient_duplicate_keys_rejected() {
        let result: SocketLabsResult<BulkRecipient> = normalize(json!({
            "emailAddress": "r@example.com",
            "mergeData": [{"key": "Color", "value": "Blue"}, {"key": "color", "value": "Red"}]
        }));
        match result {
            Err(SocketLabsError::DuplicateMergeKeys { keys, .. }) => assert_eq!(keys, vec!["color"]),
            other => panic!("expected duplicate keys, got {:?}", other),
        }

        let mut typed = BulkRecipient::new("r@example.com");
        typed.add_merge_data("A", "1").add_merge_data("a", "2");
        assert!(matches!(
            normalize(typed),
            Err(SocketLabsError::DuplicateMergeKeys { .. })
        ));
    }

    #[test]
    fn test_bulk_recipient_from_fields() {
        let recipient: BulkRecipient = normalize(json!({
            "emailAddress": "r@example.com",
            "friendlyName": "Recipient",
            "mergeData": [{"key": "Color", "value": "Blue"}]
        }))
        .unwrap();

        assert_eq!(recipient.friendly_name.as_deref(), Some("Recipient"));
        assert_eq!(recipient.merge_data, vec![MergeData::new("Color", "Blue")]);
    }

    #[test]
    fn test_global_merge_keys() {
        assert!(check_global_keys(&[MergeData::new("Age", "1"), MergeData::new("Name", "x")]).is_ok());
        let error = check_global_keys(&[MergeData::new("Age", "1"), MergeData::new("age", "2")]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid global merge data: duplicate merge data keys: age"
        );
    }

    #[test]
    fn test_attachment_from_fields() {
        let attachment: Attachment = normalize(json!({
            "name": "notes.txt",
            "content": "aGVsbG8=",
            "contentId": "notes",
            "customHeaders": [{"name": "X-Note", "value": "1"}]
        }))
        .unwrap();

        assert_eq!(attachment.content_type, "text/plain");
        assert_eq!(attachment.content_id.as_deref(), Some("notes"));
        assert_eq!(attachment.custom_headers, vec![CustomHeader::new("X-Note", "1")]);
    }

    #[test]
    fn test_attachment_requires_one_source() {
        assert!(matches!(
            normalize::<Attachment>(json!({"name": "a.txt"})),
            Err(SocketLabsError::Attachment { .. })
        ));
        assert!(matches!(
            normalize::<Attachment>(json!({"name": "a.txt", "content": "eA==", "filePath": "/tmp/a.txt"})),
            Err(SocketLabsError::Attachment { .. })
        ));
    }

    #[test]
    fn test_attachment_from_path_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b\n").unwrap();

        let attachment: Attachment = normalize(path.to_string_lossy().to_string()).unwrap();
        assert_eq!(attachment.name, "data.csv");
        assert_eq!(attachment.content_type, "text/csv");
        assert_eq!(attachment.file_path(), Some(path.as_path()));
    }
}
